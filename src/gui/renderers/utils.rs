use kiss3d::renderer::LineRenderer;

use nalgebra::Point3;

/// Samples `f` at `num_segments + 1` evenly spaced parameters, both ends
/// included.
pub fn path_iter_parametric<F, S>(
    f: F,
    t_start: S,
    t_end: S,
    num_segments: usize,
) -> impl Iterator<Item = Point3<f32>>
where
    F: Fn(S) -> Point3<f32>,
    S: nalgebra::RealField + simba::scalar::SupersetOf<usize> + Copy,
{
    // Zero segments would divide by zero below
    let num_segments = num_segments.max(1);
    let convert = nalgebra::convert::<usize, S>;
    (0..=num_segments)
        .map(move |i| convert(i) / convert(num_segments))
        .map(move |u| t_start + u * (t_end - t_start))
        .map(f)
}

/// Consecutive pairs of `points`, i.e. the segments of the polyline through
/// them. Fewer than two points give no segments.
pub fn polyline_segments<I>(points: I) -> impl Iterator<Item = (Point3<f32>, Point3<f32>)>
where
    I: IntoIterator<Item = Point3<f32>>,
{
    let mut points = points.into_iter();
    let mut start = points.next();
    points.filter_map(move |end| start.replace(end).map(|start| (start, end)))
}

pub fn draw_polyline<I>(line_renderer: &mut LineRenderer, points: I, color: Point3<f32>)
where
    I: IntoIterator<Item = Point3<f32>>,
{
    for (start, end) in polyline_segments(points) {
        line_renderer.draw_line(start, end, color);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_parametric_endpoints() {
        let points: Vec<_> =
            path_iter_parametric(|t: f64| Point3::new(t as f32, 0.0, 0.0), 1.0, 3.0, 4).collect();
        assert_eq!(points.len(), 5);
        assert_relative_eq!(points[0].x, 1.0);
        assert_relative_eq!(points[2].x, 2.0);
        assert_relative_eq!(points[4].x, 3.0);
    }

    #[test]
    fn test_zero_segments_still_a_line() {
        let points: Vec<_> =
            path_iter_parametric(|t: f64| Point3::new(t as f32, 0.0, 0.0), 0.0, 1.0, 0).collect();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_polyline_segments_chain() {
        let points = (0..4).map(|i| Point3::new(i as f32, 0.0, 0.0));
        let segments: Vec<_> = polyline_segments(points).collect();
        assert_eq!(segments.len(), 3);
        for (i, (start, end)) in segments.iter().enumerate() {
            assert_eq!(start.x, i as f32);
            assert_eq!(end.x, i as f32 + 1.0);
        }
    }

    #[test]
    fn test_polyline_needs_two_points() {
        assert_eq!(polyline_segments(Vec::new()).count(), 0);
        assert_eq!(polyline_segments(vec![Point3::origin()]).count(), 0);
    }
}
