use crate::{Float, Point2f, Vec2f};
use std::str::FromStr;

pub trait Filter: Send + Sync {
    /// Kernel value at an offset from the sample position. Offsets beyond
    /// `radius()` must evaluate to zero.
    fn evaluate(&self, p: Point2f) -> Float;

    fn radius(&self) -> Vec2f;
}

/// Reconstruction filter strategy. Closed set mirrored by the `--filter` CLI
/// option.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FilterKind {
    Box,
    Triangle,
    Gaussian,
}

impl FilterKind {
    pub const VARIANTS: &'static [&'static str] = &["box", "triangle", "gaussian"];

    pub fn create(self) -> Box<dyn Filter> {
        match self {
            FilterKind::Box => Box::new(BoxFilter::default()),
            FilterKind::Triangle => Box::new(TriangleFilter::new(Vec2f::new(2.0, 2.0))),
            FilterKind::Gaussian => Box::new(GaussianFilter::new(Vec2f::new(2.0, 2.0), 2.0)),
        }
    }
}

impl Default for FilterKind {
    fn default() -> Self {
        FilterKind::Box
    }
}

impl FromStr for FilterKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "box" => Ok(FilterKind::Box),
            "triangle" => Ok(FilterKind::Triangle),
            "gaussian" => Ok(FilterKind::Gaussian),
            other => Err(anyhow::anyhow!("unknown filter type: {}", other)),
        }
    }
}

/// Unit-weight kernel covering exactly one pixel.
pub struct BoxFilter {
    pub radius: Vec2f,
}

impl Default for BoxFilter {
    fn default() -> Self {
        Self {
            radius: Vec2f::new(0.5, 0.5),
        }
    }
}

impl Filter for BoxFilter {
    fn evaluate(&self, _p: Point2f) -> Float {
        1.0
    }

    fn radius(&self) -> Vec2f {
        self.radius
    }
}

pub struct TriangleFilter {
    radius: Vec2f,
}

impl TriangleFilter {
    pub fn new(radius: Vec2f) -> Self {
        Self { radius }
    }
}

impl Filter for TriangleFilter {
    fn evaluate(&self, p: Point2f) -> Float {
        (self.radius.x - p.x.abs()).max(0.0) * (self.radius.y - p.y.abs()).max(0.0)
    }

    fn radius(&self) -> Vec2f {
        self.radius
    }
}

/// Truncated Gaussian, shifted so the kernel falls to zero at the support
/// boundary.
pub struct GaussianFilter {
    radius: Vec2f,
    alpha: Float,
    exp_x: Float,
    exp_y: Float,
}

impl GaussianFilter {
    pub fn new(radius: Vec2f, alpha: Float) -> Self {
        Self {
            radius,
            alpha,
            exp_x: (-alpha * radius.x * radius.x).exp(),
            exp_y: (-alpha * radius.y * radius.y).exp(),
        }
    }

    fn gaussian_1d(&self, d: Float, expv: Float) -> Float {
        ((-self.alpha * d * d).exp() - expv).max(0.0)
    }
}

impl Filter for GaussianFilter {
    fn evaluate(&self, p: Point2f) -> Float {
        self.gaussian_1d(p.x, self.exp_x) * self.gaussian_1d(p.y, self.exp_y)
    }

    fn radius(&self) -> Vec2f {
        self.radius
    }
}
