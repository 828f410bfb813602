use cgmath::{InnerSpace, Matrix, Matrix4, Vector3, Vector4};

/// A plane `dot(normal, p) + distance = 0`. Points with a positive signed distance lie on the inner side.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub distance: f32,
}

impl Plane {
    fn from_row(row: Vector4<f32>) -> Self {
        Self {
            normal: row.truncate(),
            distance: row.w,
        }
    }

    pub fn signed_distance(&self, point: Vector3<f32>) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// The six clip planes of a view projection matrix.
///
/// The planes are not normalized. Signed distances are scaled by the length of each plane normal,
/// so the radius test in [Frustum::is_sphere_visible] is only approximately metric.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frustum {
    pub left: Plane,
    pub right: Plane,
    pub top: Plane,
    pub bottom: Plane,
    pub near: Plane,
    pub far: Plane,
}

impl Frustum {
    pub fn from_view_projection(view_projection: &Matrix4<f32>) -> Self {
        let row = |i: usize| view_projection.row(i);

        Self {
            left: Plane::from_row(row(3) + row(0)),
            right: Plane::from_row(row(3) - row(0)),
            top: Plane::from_row(row(3) - row(1)),
            bottom: Plane::from_row(row(3) + row(1)),
            near: Plane::from_row(row(3) + row(2)),
            far: Plane::from_row(row(3) - row(2)),
        }
    }

    pub fn planes(&self) -> [Plane; 6] {
        [self.left, self.right, self.top, self.bottom, self.near, self.far]
    }

    /// Conservative test: spheres near the frustum corners may be reported visible even though they are outside
    pub fn is_sphere_visible(&self, center: Vector3<f32>, radius: f32) -> bool {
        self.planes()
            .iter()
            .all(|plane| plane.signed_distance(center) >= -radius)
    }
}
