use cgmath::Vector3;

macro_rules! impl_euclid_elem_wise {
    ($($ty:ty),+) => {
        $(
            impl RemEuclid<Vector3<$ty>> for Vector3<$ty> {
                fn rem_euclid(self, rhs: Vector3<$ty>) -> Self {
                    Vector3::new(self.x.rem_euclid(rhs.x), self.y.rem_euclid(rhs.y), self.z.rem_euclid(rhs.z))
                }
            }

            impl DivEuclid<Vector3<$ty>> for Vector3<$ty> {
                fn div_euclid(self, rhs: Vector3<$ty>) -> Self {
                    Vector3::new(self.x.div_euclid(rhs.x), self.y.div_euclid(rhs.y), self.z.div_euclid(rhs.z))
                }
            }
        )+
    };
}

/// Element wise [i32::rem_euclid], with a separate modulus per axis
pub trait RemEuclid<T> {
    fn rem_euclid(self, rhs: T) -> Self;
}

/// Element wise [i32::div_euclid], with a separate divisor per axis
pub trait DivEuclid<T> {
    fn div_euclid(self, rhs: T) -> Self;
}

impl_euclid_elem_wise!(i8, i16, i32, i64, i128);

pub trait MapElemWise<A, T> {
    fn map_elem_wise<F: Fn(A) -> T>(self, f: F) -> Vector3<T>;
}

impl<A, T> MapElemWise<A, T> for Vector3<A> {
    fn map_elem_wise<F: Fn(A) -> T>(self, f: F) -> Vector3<T> {
        Vector3::new(f(self.x), f(self.y), f(self.z))
    }
}
