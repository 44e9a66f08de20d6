use eframe::egui::{Color32, Painter, Pos2, Stroke, vec2};

pub(super) fn mix(a: Color32, b: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((a.r() as f32 * inverse) + (b.r() as f32 * amount)) as u8,
        ((a.g() as f32 * inverse) + (b.g() as f32 * amount)) as u8,
        ((a.b() as f32 * inverse) + (b.b() as f32 * amount)) as u8,
        ((a.a() as f32 * inverse) + (b.a() as f32 * amount)) as u8,
    )
}

/// Sample of a three-stop gradient at `t` in [0, 1].
pub(super) fn three_stop(a: Color32, b: Color32, c: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        mix(a, b, t * 2.0)
    } else {
        mix(b, c, (t - 0.5) * 2.0)
    }
}

/// Scales only the alpha channel.
pub(super) fn fade(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (color.a() as f32 * factor) as u8,
    )
}

/// Lightens (positive percent) or darkens (negative) each channel, the way
/// the rim shading of node fills is derived from the role color.
pub(super) fn shade(color: Color32, percent: f32) -> Color32 {
    let amount = 2.55 * percent;
    let channel = |value: u8| (value as f32 + amount).clamp(0.0, 255.0) as u8;
    Color32::from_rgba_unmultiplied(
        channel(color.r()),
        channel(color.g()),
        channel(color.b()),
        color.a(),
    )
}

/// Point of a quadratic Bézier at parameter `t`.
pub(super) fn quad_bezier_point(start: Pos2, control: Pos2, end: Pos2, t: f32) -> Pos2 {
    let u = 1.0 - t;
    Pos2::new(
        u * u * start.x + 2.0 * u * t * control.x + t * t * end.x,
        u * u * start.y + 2.0 * u * t * control.y + t * t * end.y,
    )
}

/// Layered stand-in for a radial glow gradient: a few concentric translucent
/// discs, widest first.
pub(super) fn draw_glow(painter: &Painter, center: Pos2, radius: f32, color: Color32) {
    const LAYERS: [(f32, f32); 3] = [(3.0, 0.16), (2.2, 0.34), (1.5, 0.60)];
    for (scale, alpha) in LAYERS {
        painter.circle_filled(center, radius * scale, fade(color, alpha));
    }
}

/// Dashed circle drawn as short chords. `phase` slides the dash pattern
/// around the ring, which is what animates the status decoration.
pub(super) fn draw_dashed_ring(
    painter: &Painter,
    center: Pos2,
    radius: f32,
    stroke: Stroke,
    dash: f32,
    gap: f32,
    phase: f32,
) {
    if radius <= 0.0 || dash <= 0.0 {
        return;
    }

    let circumference = std::f32::consts::TAU * radius;
    let dash_angle = (dash / circumference) * std::f32::consts::TAU;
    let gap_angle = (gap / circumference) * std::f32::consts::TAU;
    let mut angle = (phase / circumference) * std::f32::consts::TAU;
    let end = angle + std::f32::consts::TAU;

    while angle < end {
        let from = center + vec2(angle.cos(), angle.sin()) * radius;
        let to_angle = (angle + dash_angle).min(end);
        let to = center + vec2(to_angle.cos(), to_angle.sin()) * radius;
        painter.line_segment([from, to], stroke);
        angle += dash_angle + gap_angle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_hits_both_endpoints() {
        let a = Color32::from_rgb(10, 20, 30);
        let b = Color32::from_rgb(210, 120, 90);
        assert_eq!(mix(a, b, 0.0), a);
        assert_eq!(mix(a, b, 1.0), b);
        assert_eq!(mix(a, b, 0.5), Color32::from_rgb(110, 70, 60));
    }

    #[test]
    fn three_stop_passes_through_middle_color() {
        let a = Color32::from_rgb(0, 0, 0);
        let b = Color32::from_rgb(100, 100, 100);
        let c = Color32::from_rgb(200, 0, 0);
        assert_eq!(three_stop(a, b, c, 0.0), a);
        assert_eq!(three_stop(a, b, c, 0.5), b);
        assert_eq!(three_stop(a, b, c, 1.0), c);
    }

    #[test]
    fn shade_clamps_at_channel_limits() {
        let color = Color32::from_rgb(250, 5, 128);
        let lighter = shade(color, 30.0);
        assert_eq!(lighter.r(), 255);
        let darker = shade(color, -30.0);
        assert_eq!(darker.g(), 0);
        assert_eq!(darker.a(), color.a());
    }

    #[test]
    fn bezier_interpolates_endpoints() {
        let start = Pos2::new(0.0, 0.0);
        let control = Pos2::new(50.0, 100.0);
        let end = Pos2::new(100.0, 0.0);
        assert_eq!(quad_bezier_point(start, control, end, 0.0), start);
        assert_eq!(quad_bezier_point(start, control, end, 1.0), end);
        let mid = quad_bezier_point(start, control, end, 0.5);
        assert_eq!(mid, Pos2::new(50.0, 50.0));
    }
}
