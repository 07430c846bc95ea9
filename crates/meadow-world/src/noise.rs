use fastnoise_lite::{FastNoiseLite, NoiseType};

/// Seeded 2D coherent noise. Built once per session and never reseeded.
pub struct NoiseField {
    seed: i32,
    noise: FastNoiseLite,
}

impl NoiseField {
    pub fn new(seed: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        // Callers scale coordinates themselves per octave.
        noise.set_frequency(Some(1.0));
        Self { seed, noise }
    }

    #[inline]
    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Value in `[-1, 1]`, continuous in both axes.
    #[inline]
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        self.noise.get_noise_2d(x, z).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_values() {
        let a = NoiseField::new(1234);
        let b = NoiseField::new(1234);
        for i in 0..64 {
            let x = i as f32 * 0.173 - 3.0;
            let z = i as f32 * -0.219 + 1.5;
            assert_eq!(a.sample(x, z), b.sample(x, z));
        }
    }

    #[test]
    fn samples_stay_in_unit_range() {
        let n = NoiseField::new(-77);
        for i in 0..400 {
            let v = n.sample(i as f32 * 0.37, (i * 7 % 31) as f32 * 0.53);
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = NoiseField::new(1);
        let b = NoiseField::new(2);
        let differs = (0..32).any(|i| {
            let p = i as f32 * 0.61 + 0.3;
            (a.sample(p, -p) - b.sample(p, -p)).abs() > 1e-4
        });
        assert!(differs);
    }
}
