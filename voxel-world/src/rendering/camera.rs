use cgmath::num_traits::FloatConst;
use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3};

pub struct Camera {
    pub position: Point3<f32>,
    pub yaw: Rad<f64>,
    pitch: Rad<f64>,
    projection: Projection,
}

impl Camera {
    pub fn new<V, Y, P>(position: V, yaw: Y, pitch: P, projection: Projection) -> Self
    where
        V: Into<Point3<f32>>,
        Y: Into<Rad<f64>>,
        P: Into<Rad<f64>>,
    {
        let mut camera = Camera {
            position: position.into(),
            yaw: yaw.into(),
            pitch: Rad(0.0),
            projection,
        };
        camera.set_pitch(pitch.into());
        camera
    }

    pub fn pitch(&self) -> Rad<f64> {
        self.pitch
    }

    /// Keeps the camera's angle from going too far, as the view would flip at exactly +-90 degrees
    pub fn set_pitch(&mut self, pitch: Rad<f64>) {
        let safe_frac_pi_2 = f64::FRAC_PI_2() - 0.001;
        self.pitch = Rad(pitch.0.clamp(-safe_frac_pi_2, safe_frac_pi_2));
    }

    pub fn forward(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = (self.pitch.0 as f32).sin_cos();
        let (sin_yaw, cos_yaw) = (self.yaw.0 as f32).sin_cos();

        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection.build_proj_matrix() * self.view_matrix()
    }

    pub fn world_position(&self) -> Vector3<f32> {
        self.position.to_vec()
    }
}

pub struct Projection {
    aspect: f32,
    fov_y: Rad<f32>,
    z_near: f32,
    z_far: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fov_y: F, z_near: f32, z_far: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fov_y: fov_y.into(),
            z_near,
            z_far,
        }
    }

    pub fn build_proj_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * cgmath::perspective(self.fov_y, self.aspect, self.z_near, self.z_far)
    }
}

#[rustfmt::skip]
const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[cfg(test)]
mod tests {
    use cgmath::{Deg, InnerSpace, Rad, Vector3, Vector4};

    use crate::rendering::camera::{Camera, Projection};

    #[test]
    fn test_forward_follows_yaw() {
        let projection = Projection::new(1280, 720, Deg(70.0), 0.1, 1000.0);
        let camera = Camera::new((0.0, 45.0, 0.0), Deg(0.0), Deg(0.0), projection);

        assert!((camera.forward() - Vector3::unit_x()).magnitude() < 1e-6);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let projection = Projection::new(1280, 720, Deg(70.0), 0.1, 1000.0);
        let mut camera = Camera::new((0.0, 0.0, 0.0), Deg(0.0), Deg(120.0), projection);
        assert!(camera.pitch() < Rad(std::f64::consts::FRAC_PI_2));

        camera.set_pitch(Rad(-10.0));
        assert!(camera.pitch() > Rad(-std::f64::consts::FRAC_PI_2));
    }

    #[test]
    fn test_point_in_front_maps_into_clip_volume() {
        let projection = Projection::new(1000, 1000, Deg(90.0), 0.1, 1000.0);
        let camera = Camera::new((0.0, 0.0, 0.0), Deg(0.0), Deg(0.0), projection);

        let clip = camera.view_projection() * Vector4::new(10.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(clip.w > 0.0);
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
