use eframe::egui::{Align2, Color32, FontId, Response, Sense, Ui, Vec2, Widget};

/// a round dial for picking one of `count` positions, like the hours on a clock face
/// the current value is written in the middle
pub struct Dial<'a> {
    value: &'a mut u8,
    count: u8,
    hand_color: Option<Color32>,
    radius: Option<f32>,
}

impl<'a> Dial<'a> {
    pub const fn new(value: &'a mut u8, count: u8) -> Self {
        Self {
            value,
            // a dial with no positions still has the one it's on
            count: if count == 0 { 1 } else { count },
            hand_color: None,
            radius: None,
        }
    }

    #[must_use]
    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    #[must_use]
    pub fn hand_color(mut self, color: Color32) -> Self {
        self.hand_color = Some(color);
        self
    }
}

impl Widget for Dial<'_> {
    // partially from https://github.com/obsqrbtz/egui_knob and https://codeberg.org/pintariching/egui_timepicker
    fn ui(self, ui: &mut Ui) -> Response {
        let Self {
            value,
            count,
            hand_color,
            radius,
        } = self;

        let radius = radius.unwrap_or_else(|| ui.spacing().slider_width / 2.);
        let (rect, mut response) =
            ui.allocate_exact_size(Vec2::splat(radius * 2.), Sense::click_and_drag());
        // the angle (degrees) each position takes up
        let part_angle = 360. / f32::from(count);
        if response.dragged() || response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                // +90 so that zero is at the top rather than at three o'clock
                let angle =
                    ((pointer - rect.center()).angle().to_degrees() + 90.).rem_euclid(360.);
                let picked = (angle / part_angle).floor() as u8;
                let picked = picked.min(count - 1);
                if picked != *value {
                    *value = picked;
                    response.mark_changed();
                }
            }
        }

        let visuals = ui.style().interact(&response);
        let border = visuals.fg_stroke;
        let painter = ui.painter();
        painter.circle_filled(rect.center(), radius, visuals.bg_fill);
        painter.circle_stroke(rect.center(), radius, border);

        let angle = part_angle.mul_add(f32::from(*value), -90.).to_radians();
        let tip = rect.center() + Vec2::angled(angle) * border.width.mul_add(-2., radius);
        let mut hand = visuals.fg_stroke;
        if let Some(color) = hand_color {
            hand.color = color;
        }
        painter.line_segment([rect.center(), tip], hand);
        painter.circle_filled(tip, hand.width * 2., hand.color);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            format!("{:02}", *value),
            FontId::proportional(radius / 2.),
            visuals.text_color(),
        );
        response
    }
}
