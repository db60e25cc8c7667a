use crate::error::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Probability that a newborn is named Julie, independent of sex
pub const JULIE_FRACTION: f64 = 0.05;

/// Families to generate for the "at least one girl" question
pub const GIRL_TRIALS: u32 = 10_000;

/// Families to generate for the "girl named Julie" question.
/// The conditioning event is rare, so this sample is much larger.
pub const JULIE_TRIALS: u32 = 500_000;

/// The distinguishing name
pub const JULIE: &str = "Julie";

const NOT_JULIE: &str = "NotJulie";

/// A child, with sex and name drawn independently
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Child {
    name: String,
    female: bool,
}

impl Child {
    /// Generate a child: female with probability 0.5, named Julie
    /// with probability [`JULIE_FRACTION`]
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let female = rng.gen_bool(0.5);
        let name = if rng.gen_bool(JULIE_FRACTION) {
            JULIE
        } else {
            NOT_JULIE
        };
        Self {
            name: name.to_owned(),
            female,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_female(&self) -> bool {
        self.female
    }

    pub fn is_girl_named(&self, name: &str) -> bool {
        self.female && self.name == name
    }
}

/// A two-child family, created fresh per trial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
    children: [Child; 2],
}

impl Family {
    /// Generate a family of two independently drawn children
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            children: [Child::generate(rng), Child::generate(rng)],
        }
    }

    pub fn children(&self) -> &[Child; 2] {
        &self.children
    }

    /// Number of girls (0, 1 or 2)
    pub fn girl_count(&self) -> usize {
        self.children.iter().filter(|c| c.is_female()).count()
    }

    pub fn has_girl(&self) -> bool {
        self.girl_count() > 0
    }

    pub fn has_girl_named(&self, name: &str) -> bool {
        self.children.iter().any(|c| c.is_girl_named(name))
    }

    pub fn both_girls(&self) -> bool {
        self.girl_count() == 2
    }
}

/// Running tally for one conditional probability estimate
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize)]
pub struct ConditionalEstimate {
    /// Samples seen
    samples: u32,

    /// Samples satisfying the conditioning event
    qualifying: u32,

    /// Qualifying samples also satisfying the target event
    matching: u32,
}

impl ConditionalEstimate {
    /// Record one sample. `matches` is only counted when `qualifies` holds.
    pub fn record(&mut self, qualifies: bool, matches: bool) {
        self.samples += 1;
        if qualifies {
            self.qualifying += 1;
            if matches {
                self.matching += 1;
            }
        }
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    pub fn qualifying(&self) -> u32 {
        self.qualifying
    }

    pub fn matching(&self) -> u32 {
        self.matching
    }

    /// The estimated conditional probability. Fails with
    /// [`Error::NoQualifyingSamples`] instead of dividing by zero.
    pub fn probability(&self) -> Result<f64> {
        if self.qualifying == 0 {
            return Err(Error::NoQualifyingSamples);
        }
        Ok(self.matching as f64 / self.qualifying as f64)
    }
}

/// Generate `families` two-child families and estimate both posteriors
/// over the same batch:
///
/// 1. P(both girls | at least one girl), expected to approach 1/3;
/// 2. P(both girls | a girl named Julie), expected to approach 1/2.
pub fn run_trials<R: Rng + ?Sized>(
    rng: &mut R,
    families: u32,
) -> (ConditionalEstimate, ConditionalEstimate) {
    let mut given_girl = ConditionalEstimate::default();
    let mut given_julie = ConditionalEstimate::default();

    for _ in 0..families {
        let family = Family::generate(rng);
        let both = family.both_girls();
        given_girl.record(family.has_girl(), both);
        given_julie.record(family.has_girl_named(JULIE), both);
    }

    debug!(
        families,
        with_girl = given_girl.qualifying(),
        with_julie = given_julie.qualifying(),
        "family trials complete"
    );

    (given_girl, given_julie)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn julie_frequency_is_about_five_percent() {
        let mut rng = StdRng::seed_from_u64(11);
        let children = 100_000;
        let julies = (0..children)
            .filter(|_| Child::generate(&mut rng).name() == JULIE)
            .count();
        let ratio = julies as f64 / children as f64;
        assert!((0.045..0.055).contains(&ratio), "ratio = {ratio}");
    }

    #[test]
    fn name_is_drawn_independently_of_sex() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut girls = 0u32;
        let mut julie_girls = 0u32;
        let mut boys = 0u32;
        let mut julie_boys = 0u32;
        for _ in 0..200_000 {
            let child = Child::generate(&mut rng);
            if child.is_female() {
                girls += 1;
                julie_girls += (child.name() == JULIE) as u32;
            } else {
                boys += 1;
                julie_boys += (child.name() == JULIE) as u32;
            }
        }
        let girl_ratio = julie_girls as f64 / girls as f64;
        let boy_ratio = julie_boys as f64 / boys as f64;
        assert!(
            (girl_ratio - boy_ratio).abs() < 0.01,
            "girls = {girl_ratio}, boys = {boy_ratio}"
        );
    }

    #[test]
    fn families_always_have_two_children() {
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..100 {
            let family = Family::generate(&mut rng);
            assert_eq!(family.children().len(), 2);
            assert!(family.girl_count() <= 2);
        }
    }

    #[test]
    fn empty_estimate_is_an_error() {
        let estimate = ConditionalEstimate::default();
        assert!(matches!(
            estimate.probability(),
            Err(Error::NoQualifyingSamples)
        ));

        let mut estimate = ConditionalEstimate::default();
        estimate.record(false, true);
        assert!(matches!(
            estimate.probability(),
            Err(Error::NoQualifyingSamples)
        ));
    }

    #[test]
    fn matching_requires_qualifying() {
        let mut estimate = ConditionalEstimate::default();
        estimate.record(true, true);
        estimate.record(true, false);
        estimate.record(false, true);
        assert_eq!(estimate.samples(), 3);
        assert_eq!(estimate.qualifying(), 2);
        assert_eq!(estimate.matching(), 1);
        assert_eq!(estimate.probability().unwrap(), 0.5);
    }
}
