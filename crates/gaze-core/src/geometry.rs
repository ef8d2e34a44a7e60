//! Eye-center geometry and the coordinate-comparison gaze heuristic

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::validate::{check_finite, ValidationError};
use crate::GazeError;

/// Points per eye outline in the 6-point convention
pub const EYE_OUTLINE_POINTS: usize = 6;

/// 2D landmark coordinate in frame pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Ordered outline of one eye.
///
/// Index 0 is the leftmost point, 3 the rightmost, 1 and 4 approximate the
/// top and bottom of the lid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct EyeLandmarkSet {
    points: Vec<Point>,
}

impl EyeLandmarkSet {
    /// Create an eye outline, requiring at least six finite points
    pub fn new(points: Vec<Point>) -> Result<Self, ValidationError> {
        if points.len() < EYE_OUTLINE_POINTS {
            return Err(ValidationError::LandmarkCount {
                expected: EYE_OUTLINE_POINTS,
                actual: points.len(),
            });
        }
        check_finite(&points)?;
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn leftmost(&self) -> Point {
        self.points[0]
    }

    pub fn top(&self) -> Point {
        self.points[1]
    }

    pub fn rightmost(&self) -> Point {
        self.points[3]
    }

    pub fn bottom(&self) -> Point {
        self.points[4]
    }

    /// Mean of every outline point
    pub fn center(&self) -> Point {
        mean(&self.points)
    }
}

impl TryFrom<Vec<Point>> for EyeLandmarkSet {
    type Error = ValidationError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<EyeLandmarkSet> for Vec<Point> {
    fn from(set: EyeLandmarkSet) -> Self {
        set.points
    }
}

/// Full 68-point face landmark layout (iBUG 300-W ordering)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct FaceLandmarks68 {
    points: Vec<Point>,
}

impl FaceLandmarks68 {
    pub const POINT_COUNT: usize = 68;
    const LEFT_EYE: std::ops::Range<usize> = 36..42;
    const RIGHT_EYE: std::ops::Range<usize> = 42..48;

    pub fn new(points: Vec<Point>) -> Result<Self, ValidationError> {
        if points.len() != Self::POINT_COUNT {
            return Err(ValidationError::LandmarkCount {
                expected: Self::POINT_COUNT,
                actual: points.len(),
            });
        }
        check_finite(&points)?;
        Ok(Self { points })
    }

    /// Outline of the eye on the left side of the image
    pub fn left_eye(&self) -> EyeLandmarkSet {
        EyeLandmarkSet {
            points: self.points[Self::LEFT_EYE].to_vec(),
        }
    }

    /// Outline of the eye on the right side of the image
    pub fn right_eye(&self) -> EyeLandmarkSet {
        EyeLandmarkSet {
            points: self.points[Self::RIGHT_EYE].to_vec(),
        }
    }
}

impl TryFrom<Vec<Point>> for FaceLandmarks68 {
    type Error = ValidationError;

    fn try_from(points: Vec<Point>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<FaceLandmarks68> for Vec<Point> {
    fn from(face: FaceLandmarks68) -> Self {
        face.points
    }
}

/// Horizontal half of the geometric estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizontal {
    Left,
    Right,
}

impl Horizontal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Horizontal::Left => "left",
            Horizontal::Right => "right",
        }
    }
}

/// Vertical half of the geometric estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vertical {
    Up,
    Down,
}

impl Vertical {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vertical::Up => "up",
            Vertical::Down => "down",
        }
    }
}

/// Axis pair produced by [`estimate_gaze_from_eyes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometricGaze {
    pub horizontal: Horizontal,
    pub vertical: Vertical,
}

/// Everything the geometric path derives from one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometricEstimate {
    pub left_eye_center: Point,
    pub right_eye_center: Point,
    pub horizontal: Horizontal,
    pub vertical: Vertical,
    pub gaze_center: Point,
}

impl GeometricEstimate {
    /// Run the geometric estimator over both eye outlines
    pub fn from_landmarks(left: &EyeLandmarkSet, right: &EyeLandmarkSet) -> Self {
        let left_eye_center = left.center();
        let right_eye_center = right.center();
        let gaze = estimate_gaze_from_eyes(left_eye_center, right_eye_center);
        let gaze_center = estimate_gaze_center(left_eye_center, right_eye_center);

        debug!(
            horizontal = gaze.horizontal.as_str(),
            vertical = gaze.vertical.as_str(),
            "Geometric gaze estimate"
        );

        Self {
            left_eye_center,
            right_eye_center,
            horizontal: gaze.horizontal,
            vertical: gaze.vertical,
            gaze_center,
        }
    }
}

fn mean(points: &[Point]) -> Point {
    let n = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sum_x / n, sum_y / n)
}

/// Unweighted mean of all points in an eye outline
pub fn compute_eye_center(points: &[Point]) -> Result<Point, GazeError> {
    if points.is_empty() {
        return Err(GazeError::InvalidInput(
            "cannot compute the center of an empty landmark set".into(),
        ));
    }
    Ok(mean(points))
}

/// Compare the two eye centers in frame coordinates.
///
/// Strict less-than on both axes: ties resolve to `Right` and `Down`.
pub fn estimate_gaze_from_eyes(left_eye_center: Point, right_eye_center: Point) -> GeometricGaze {
    let horizontal = if left_eye_center.x < right_eye_center.x {
        Horizontal::Left
    } else {
        Horizontal::Right
    };
    let vertical = if left_eye_center.y < right_eye_center.y {
        Vertical::Up
    } else {
        Vertical::Down
    };
    GeometricGaze {
        horizontal,
        vertical,
    }
}

/// Midpoint of the two eye centers
pub fn estimate_gaze_center(left_eye_center: Point, right_eye_center: Point) -> Point {
    Point::new(
        (left_eye_center.x + right_eye_center.x) / 2.0,
        (left_eye_center.y + right_eye_center.y) / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn outline(cx: f64, cy: f64) -> EyeLandmarkSet {
        EyeLandmarkSet::new(vec![
            Point::new(cx - 10.0, cy),
            Point::new(cx - 4.0, cy - 3.0),
            Point::new(cx + 4.0, cy - 3.0),
            Point::new(cx + 10.0, cy),
            Point::new(cx + 4.0, cy + 3.0),
            Point::new(cx - 4.0, cy + 3.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_eye_center_is_mean_of_all_points() {
        let points = [Point::new(0.0, 0.0), Point::new(4.0, 2.0), Point::new(2.0, 7.0)];
        let center = compute_eye_center(&points).unwrap();
        assert!((center.x - 2.0).abs() < 1e-12);
        assert!((center.y - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_eye_center_empty_fails() {
        let err = compute_eye_center(&[]).unwrap_err();
        assert!(matches!(err, GazeError::InvalidInput(_)));
    }

    #[test]
    fn test_tie_resolves_right_down() {
        let gaze = estimate_gaze_from_eyes(Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        assert_eq!(gaze.horizontal, Horizontal::Right);
        assert_eq!(gaze.vertical, Vertical::Down);
    }

    #[test]
    fn test_left_up() {
        let gaze = estimate_gaze_from_eyes(Point::new(100.0, 50.0), Point::new(160.0, 52.0));
        assert_eq!(
            gaze,
            GeometricGaze {
                horizontal: Horizontal::Left,
                vertical: Vertical::Up
            }
        );
    }

    #[test]
    fn test_gaze_center_midpoint() {
        let c = estimate_gaze_center(Point::new(10.0, 20.0), Point::new(30.0, 40.0));
        assert_eq!(c, Point::new(20.0, 30.0));
    }

    #[test]
    fn test_estimate_from_landmarks() {
        let est = GeometricEstimate::from_landmarks(&outline(100.0, 80.0), &outline(160.0, 80.0));
        assert!((est.left_eye_center.x - 100.0).abs() < 1e-9);
        assert!((est.right_eye_center.x - 160.0).abs() < 1e-9);
        assert!((est.gaze_center.x - 130.0).abs() < 1e-9);
        assert_eq!(est.horizontal, Horizontal::Left);
        // equal heights fall to the else branch
        assert_eq!(est.vertical, Vertical::Down);
    }

    #[test]
    fn test_eye_set_requires_six_points() {
        let err = EyeLandmarkSet::new(vec![Point::default(); 4]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::LandmarkCount {
                expected: 6,
                actual: 4
            }
        );
    }

    #[test]
    fn test_eye_set_rejects_nan() {
        let mut points = vec![Point::new(1.0, 1.0); 6];
        points[2].y = f64::NAN;
        assert!(matches!(
            EyeLandmarkSet::new(points),
            Err(ValidationError::NonFiniteLandmark { index: 2, .. })
        ));
    }

    #[test]
    fn test_eye_set_deserializes_from_point_array() {
        let json = r#"[{"x":1,"y":2},{"x":3,"y":4},{"x":5,"y":6},{"x":7,"y":8},{"x":9,"y":10},{"x":11,"y":12}]"#;
        let set: EyeLandmarkSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.rightmost(), Point::new(7.0, 8.0));
        assert_eq!(set.bottom(), Point::new(9.0, 10.0));

        let short = r#"[{"x":1,"y":2}]"#;
        assert!(serde_json::from_str::<EyeLandmarkSet>(short).is_err());
    }

    #[test]
    fn test_face68_eye_slices() {
        let points: Vec<Point> = (0..68).map(|i| Point::new(i as f64, 0.0)).collect();
        let face = FaceLandmarks68::new(points).unwrap();
        assert_eq!(face.left_eye().leftmost().x, 36.0);
        assert_eq!(face.left_eye().points().len(), 6);
        assert_eq!(face.right_eye().leftmost().x, 42.0);
        assert_eq!(face.right_eye().points().last().map(|p| p.x), Some(47.0));
    }

    #[test]
    fn test_face68_wrong_count() {
        assert!(FaceLandmarks68::new(vec![Point::default(); 67]).is_err());
    }

    proptest! {
        #[test]
        fn test_center_translation_linearity(
            coords in prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 1..20),
            a in -500.0f64..500.0,
            b in -500.0f64..500.0,
        ) {
            let points: Vec<Point> = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
            let moved: Vec<Point> = points.iter().map(|p| Point::new(p.x + a, p.y + b)).collect();

            let c = compute_eye_center(&points).unwrap();
            let m = compute_eye_center(&moved).unwrap();

            prop_assert!((m.x - (c.x + a)).abs() < 1e-6);
            prop_assert!((m.y - (c.y + b)).abs() < 1e-6);
        }

        #[test]
        fn test_center_scaling_linearity(
            coords in prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0), 1..20),
            s in 0.1f64..10.0,
        ) {
            let points: Vec<Point> = coords.iter().map(|&(x, y)| Point::new(x, y)).collect();
            let scaled: Vec<Point> = points.iter().map(|p| Point::new(p.x * s, p.y * s)).collect();

            let c = compute_eye_center(&points).unwrap();
            let m = compute_eye_center(&scaled).unwrap();

            prop_assert!((m.x - c.x * s).abs() < 1e-6);
            prop_assert!((m.y - c.y * s).abs() < 1e-6);
        }
    }
}
