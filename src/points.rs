use egui::Pos2;

/// A picked location in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_pos2(self) -> Pos2 {
        Pos2::new(self.x as f32, self.y as f32)
    }
}

impl From<Pos2> for Point {
    fn from(pos: Pos2) -> Self {
        Self::new(pos.x as f64, pos.y as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("at least two points required, found {found}")]
pub struct InsufficientPoints {
    pub found: usize,
}

/// Distance between the points at indices `first` and `second`, with
/// `first < second`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairDistance {
    pub first: usize,
    pub second: usize,
    pub distance: f64,
}

/// Euclidean distance in double precision.
pub fn distance(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Distances for every pair (i, j) with i < j, ordered by i then j.
pub fn pairwise_distances(points: &[Point]) -> Result<Vec<f64>, InsufficientPoints> {
    let n = points.len();
    if n < 2 {
        return Err(InsufficientPoints { found: n });
    }

    let mut distances = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            distances.push(distance(points[i], points[j]));
        }
    }
    Ok(distances)
}

/// Same enumeration as `pairwise_distances`, keeping the indices of each pair.
pub fn indexed_pairwise_distances(points: &[Point]) -> Result<Vec<PairDistance>, InsufficientPoints> {
    let distances = pairwise_distances(points)?;
    let n = points.len();
    let pairs = (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j)));
    Ok(pairs
        .zip(distances)
        .map(|((first, second), distance)| PairDistance {
            first,
            second,
            distance,
        })
        .collect())
}

/// Ordered list of picked points. Points are only ever appended; `clear`
/// drops the whole session.
#[derive(Debug, Default)]
pub struct PointStore {
    points: Vec<Point>,
}

impl PointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    pub fn distances(&self) -> Result<Vec<PairDistance>, InsufficientPoints> {
        indexed_pairwise_distances(&self.points)
    }
}
