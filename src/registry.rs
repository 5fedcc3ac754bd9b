use std::fmt;

use chrono::NaiveDateTime;

use crate::{
    error::InvalidTimeError,
    time::{DedupeKey, TimeOfDay},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlarmKind {
    Wake,
    Bedtime,
}

impl AlarmKind {
    pub const ALL: [Self; 2] = [Self::Wake, Self::Bedtime];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Wake => "Alarm",
            Self::Bedtime => "Bedtime",
        }
    }
}

impl fmt::Display for AlarmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wake => "alarm",
            Self::Bedtime => "bedtime",
        })
    }
}

/// one of the two alarms the clock has
/// an unarmed slot keeps its target so it can still be shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmSlot {
    pub kind: AlarmKind,
    pub armed: bool,
    pub target: TimeOfDay,
    pub last_fired: Option<DedupeKey>,
}

impl AlarmSlot {
    const fn unarmed(kind: AlarmKind) -> Self {
        Self {
            kind,
            armed: false,
            target: TimeOfDay::MIDNIGHT,
            last_fired: None,
        }
    }

    /// records the minute as fired and returns true if the slot should go off now
    pub(crate) fn check(&mut self, now: NaiveDateTime) -> bool {
        if !self.armed || !self.target.matches(now) {
            return false;
        }
        let key = DedupeKey::from(now);
        if self.last_fired == Some(key) {
            return false;
        }
        self.last_fired = Some(key);
        true
    }
}

/// holds exactly one wake alarm and one bedtime alarm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmRegistry {
    wake: AlarmSlot,
    bedtime: AlarmSlot,
}

impl Default for AlarmRegistry {
    fn default() -> Self {
        Self {
            wake: AlarmSlot::unarmed(AlarmKind::Wake),
            bedtime: AlarmSlot::unarmed(AlarmKind::Bedtime),
        }
    }
}

impl AlarmRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// arms the slot for `kind` at a new time, forgetting when it last went off
    ///
    /// # Errors
    /// if the time is out of range, in which case the slot is left as it was
    pub fn set_alarm(
        &mut self,
        kind: AlarmKind,
        hour: u32,
        minute: u32,
    ) -> Result<TimeOfDay, InvalidTimeError> {
        let target = TimeOfDay::new(hour, minute)?;
        let slot = self.slot_mut(kind);
        slot.target = target;
        slot.armed = true;
        slot.last_fired = None;
        Ok(target)
    }

    pub fn clear_alarm(&mut self, kind: AlarmKind) {
        self.slot_mut(kind).armed = false;
    }

    #[must_use]
    pub fn get_alarm(&self, kind: AlarmKind) -> AlarmSlot {
        match kind {
            AlarmKind::Wake => self.wake.clone(),
            AlarmKind::Bedtime => self.bedtime.clone(),
        }
    }

    pub(crate) fn slot_mut(&mut self, kind: AlarmKind) -> &mut AlarmSlot {
        match kind {
            AlarmKind::Wake => &mut self.wake,
            AlarmKind::Bedtime => &mut self.bedtime,
        }
    }
}
