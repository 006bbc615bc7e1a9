//! Synthetic applicant pools.
use rand::Rng;

use crate::distribution::ScoreSampler;
use crate::numbers::{u64_to_f64, usize_to_f64};

/// Anonymous applicants, identified only by position.
///
/// `skill[i]` and `luck[i]` belong to applicant `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantPool {
    skill: Vec<u8>,
    luck: Vec<u8>,
}

impl ApplicantPool {
    /// Draw `size` skill scores, then `size` luck scores, from one stream.
    pub fn generate<R: Rng + ?Sized>(sampler: &ScoreSampler, size: usize, rng: &mut R) -> Self {
        let skill = sampler.draw_many(rng, size);
        let luck = sampler.draw_many(rng, size);
        Self { skill, luck }
    }

    /// Build a pool from explicit scores; both slices must be equally long.
    #[must_use]
    pub fn from_scores(skill: Vec<u8>, luck: Vec<u8>) -> Option<Self> {
        (skill.len() == luck.len()).then_some(Self { skill, luck })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.skill.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skill.is_empty()
    }

    #[must_use]
    pub fn skill(&self) -> &[u8] {
        &self.skill
    }

    #[must_use]
    pub fn luck(&self) -> &[u8] {
        &self.luck
    }

    /// Weighted score `(1 - w) * skill + w * luck` for every applicant.
    #[must_use]
    pub fn composite_scores(&self, luck_weight: f64) -> Vec<f64> {
        let skill_weight = 1.0 - luck_weight;
        self.skill
            .iter()
            .zip(&self.luck)
            .map(|(&skill, &luck)| skill_weight * f64::from(skill) + luck_weight * f64::from(luck))
            .collect()
    }

    /// Mean luck score over a set of applicant indices.
    #[must_use]
    pub fn mean_luck(&self, indices: &[usize]) -> f64 {
        if indices.is_empty() {
            return 0.0;
        }
        let total: u64 = indices
            .iter()
            .filter_map(|&idx| self.luck.get(idx))
            .map(|&luck| u64::from(luck))
            .sum();
        u64_to_f64(total) / usize_to_f64(indices.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::ScoreDistribution;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn sample_pool() -> ApplicantPool {
        ApplicantPool::from_scores(vec![90, 10, 50], vec![0, 100, 60]).unwrap()
    }

    #[test]
    fn generate_fills_both_attributes() {
        let sampler = ScoreDistribution::Uniform.sampler().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let pool = ApplicantPool::generate(&sampler, 250, &mut rng);
        assert_eq!(pool.len(), 250);
        assert_eq!(pool.luck().len(), 250);
        assert_ne!(pool.skill(), pool.luck());
    }

    #[test]
    fn from_scores_rejects_mismatched_lengths() {
        assert!(ApplicantPool::from_scores(vec![1, 2], vec![3]).is_none());
    }

    #[test]
    fn composite_interpolates_between_attributes() {
        let pool = sample_pool();
        assert_eq!(pool.composite_scores(0.0), vec![90.0, 10.0, 50.0]);
        assert_eq!(pool.composite_scores(1.0), vec![0.0, 100.0, 60.0]);
        let half = pool.composite_scores(0.5);
        assert!((half[0] - 45.0).abs() < 1e-12);
        assert!((half[1] - 55.0).abs() < 1e-12);
        assert!((half[2] - 55.0).abs() < 1e-12);
    }

    #[test]
    fn mean_luck_averages_selected_rows() {
        let pool = sample_pool();
        assert!((pool.mean_luck(&[1, 2]) - 80.0).abs() < 1e-12);
        assert!(pool.mean_luck(&[]).abs() < f64::EPSILON);
    }
}
