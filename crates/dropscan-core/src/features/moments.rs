use imageproc::point::Point;

use crate::consts::MOMENT_EPSILON;

/// Spatial, central and normalized central moments of a closed polygon up to
/// third order, computed exactly from its vertices via Green's theorem.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m11: f64,
    pub m02: f64,
    pub m30: f64,
    pub m21: f64,
    pub m12: f64,
    pub m03: f64,
    pub mu20: f64,
    pub mu11: f64,
    pub mu02: f64,
    pub mu30: f64,
    pub mu21: f64,
    pub mu12: f64,
    pub mu03: f64,
    pub nu20: f64,
    pub nu11: f64,
    pub nu02: f64,
    pub nu30: f64,
    pub nu21: f64,
    pub nu12: f64,
    pub nu03: f64,
}

impl Moments {
    /// Moments of the polygon outlined by `points`. The result does not depend
    /// on the winding direction. Degenerate polygons yield all zeros.
    pub fn of_polygon(points: &[Point<i32>]) -> Self {
        if points.len() < 3 {
            return Self::default();
        }

        let (mut a00, mut a10, mut a01) = (0.0, 0.0, 0.0);
        let (mut a20, mut a11, mut a02) = (0.0, 0.0, 0.0);
        let (mut a30, mut a21, mut a12, mut a03) = (0.0, 0.0, 0.0, 0.0);

        let last = points[points.len() - 1];
        let (mut xp, mut yp) = (last.x as f64, last.y as f64);
        for p in points {
            let (x, y) = (p.x as f64, p.y as f64);
            let (x2, y2) = (x * x, y * y);
            let (xp2, yp2) = (xp * xp, yp * yp);
            let cross = xp * y - x * yp;
            let sx = xp + x;
            let sy = yp + y;

            a00 += cross;
            a10 += cross * sx;
            a01 += cross * sy;
            a20 += cross * (xp * sx + x2);
            a11 += cross * (xp * (sy + yp) + x * (sy + y));
            a02 += cross * (yp * sy + y2);
            a30 += cross * sx * (xp2 + x2);
            a03 += cross * sy * (yp2 + y2);
            a21 += cross * (xp2 * (3.0 * yp + y) + 2.0 * x * xp * sy + x2 * (yp + 3.0 * y));
            a12 += cross * (yp2 * (3.0 * xp + x) + 2.0 * y * yp * sx + y2 * (xp + 3.0 * x));

            xp = x;
            yp = y;
        }

        if a00.abs() <= MOMENT_EPSILON {
            return Self::default();
        }
        // Normalize winding so the enclosed area is positive.
        let sign = a00.signum();

        let mut m = Self {
            m00: sign * a00 / 2.0,
            m10: sign * a10 / 6.0,
            m01: sign * a01 / 6.0,
            m20: sign * a20 / 12.0,
            m11: sign * a11 / 24.0,
            m02: sign * a02 / 12.0,
            m30: sign * a30 / 20.0,
            m21: sign * a21 / 60.0,
            m12: sign * a12 / 60.0,
            m03: sign * a03 / 20.0,
            ..Self::default()
        };
        m.complete();
        m
    }

    fn complete(&mut self) {
        let cx = self.m10 / self.m00;
        let cy = self.m01 / self.m00;

        self.mu20 = self.m20 - self.m10 * cx;
        self.mu11 = self.m11 - self.m10 * cy;
        self.mu02 = self.m02 - self.m01 * cy;
        self.mu30 = self.m30 - cx * (3.0 * self.mu20 + cx * self.m10);
        self.mu21 = self.m21 - cx * (2.0 * self.mu11 + cx * self.m01) - cy * self.mu20;
        self.mu12 = self.m12 - cy * (2.0 * self.mu11 + cy * self.m10) - cx * self.mu02;
        self.mu03 = self.m03 - cy * (3.0 * self.mu02 + cy * self.m01);

        let inv_m00 = 1.0 / self.m00;
        let s2 = inv_m00 * inv_m00;
        let s3 = s2 * inv_m00.abs().sqrt();

        self.nu20 = self.mu20 * s2;
        self.nu11 = self.mu11 * s2;
        self.nu02 = self.mu02 * s2;
        self.nu30 = self.mu30 * s3;
        self.nu21 = self.mu21 * s3;
        self.nu12 = self.mu12 * s3;
        self.nu03 = self.mu03 * s3;
    }

    /// Area-weighted center `(x, y)`, or `None` when the area is zero.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.m00 == 0.0 {
            None
        } else {
            Some((self.m10 / self.m00, self.m01 / self.m00))
        }
    }

    /// The seven Hu invariants, unaffected by translation, scale and rotation.
    pub fn hu(&self) -> [f64; 7] {
        let (n20, n11, n02) = (self.nu20, self.nu11, self.nu02);
        let (n30, n21, n12, n03) = (self.nu30, self.nu21, self.nu12, self.nu03);

        let mut t0 = n30 + n12;
        let mut t1 = n21 + n03;
        let q0 = t0 * t0;
        let q1 = t1 * t1;
        let n4 = 4.0 * n11;
        let s = n20 + n02;
        let d = n20 - n02;

        let h0 = s;
        let h1 = d * d + n4 * n11;
        let h3 = q0 + q1;
        let h5 = d * (q0 - q1) + n4 * t0 * t1;

        t0 *= q0 - 3.0 * q1;
        t1 *= 3.0 * q0 - q1;

        let r0 = n30 - 3.0 * n12;
        let r1 = 3.0 * n21 - n03;

        let h2 = r0 * r0 + r1 * r1;
        let h4 = r0 * t0 + r1 * t1;
        let h6 = r1 * t0 - r0 * t1;

        [h0, h1, h2, h3, h4, h5, h6]
    }
}
