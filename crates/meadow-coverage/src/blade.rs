use meadow_geom::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CutState {
    #[default]
    Uncut,
    Cut,
}

impl CutState {
    #[inline]
    pub fn is_cut(self) -> bool {
        matches!(self, CutState::Cut)
    }
}

/// One unit of mowable coverage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Blade {
    pub position: Vec3,
    pub yaw: f32,
    pub scale: f32,
    pub state: CutState,
}

impl Blade {
    #[inline]
    pub fn new(position: Vec3, yaw: f32, scale: f32) -> Self {
        Self {
            position,
            yaw,
            scale,
            state: CutState::Uncut,
        }
    }

    #[inline]
    pub fn is_cut(&self) -> bool {
        self.state.is_cut()
    }
}
