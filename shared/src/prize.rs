use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Outcome classes of the roulette draw.
///
/// The discriminants double as indices into the static catalog, so the order
/// here must match `CATALOG`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "FULL")]
    Full = 0,
    #[serde(rename = "GEISHA")]
    Geisha = 1,
    #[serde(rename = "100")]
    Cashback100 = 2,
    #[serde(rename = "RETRY")]
    RetryCredit = 3,
    #[serde(rename = "LOSE")]
    Lose = 4,
}

impl Category {
    pub const COUNT: usize = 5;

    pub const ALL: [Category; Category::COUNT] = [
        Category::Full,
        Category::Geisha,
        Category::Cashback100,
        Category::RetryCredit,
        Category::Lose,
    ];

    /// Catalog entry for this category.
    pub fn outcome(self) -> &'static PrizeOutcome {
        &CATALOG[self as usize]
    }

    /// Name used on the wire and in the log sheet.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Geisha => "GEISHA",
            Self::Cashback100 => "100",
            Self::RetryCredit => "RETRY",
            Self::Lose => "LOSE",
        }
    }

    pub fn is_win(self) -> bool {
        !matches!(self, Self::Lose)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown prize category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.wire_name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A prize as shown to the player. Only ever borrowed from `CATALOG`.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PrizeOutcome {
    pub id: &'static str,
    pub category: Category,
    pub label: &'static str,
    pub color: &'static str,
    pub coupon_code: Option<&'static str>,
}

static CATALOG: [PrizeOutcome; Category::COUNT] = [
    PrizeOutcome {
        id: "full",
        category: Category::Full,
        label: "全額キャッシュバック！",
        color: "#ff0000",
        coupon_code: None,
    },
    PrizeOutcome {
        id: "geisha",
        category: Category::Geisha,
        label: "ゲイシャをプレゼント！",
        color: "#d946ef",
        coupon_code: Some("WF45SJCN"),
    },
    PrizeOutcome {
        id: "100",
        category: Category::Cashback100,
        label: "100円キャッシュバック！",
        color: "#ffff00",
        coupon_code: Some("KYQ4WE35"),
    },
    PrizeOutcome {
        id: "retry",
        category: Category::RetryCredit,
        label: "もう一回チャレンジ！",
        color: "#22c55e",
        coupon_code: None,
    },
    PrizeOutcome {
        id: "lose",
        category: Category::Lose,
        label: "残念、はずれ！",
        color: "#cccccc",
        coupon_code: None,
    },
];

/// Ordered (category, weight) pairs partitioning `[0, total)` into
/// contiguous half-open intervals, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightTable {
    entries: &'static [(Category, u32)],
    total: u32,
}

impl WeightTable {
    pub const fn new(entries: &'static [(Category, u32)], total: u32) -> Self {
        Self { entries, total }
    }

    pub fn entries(&self) -> &'static [(Category, u32)] {
        self.entries
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Every category exactly once and the weights add up to `total`.
    pub const fn is_well_formed(&self) -> bool {
        let mut seen = [false; Category::COUNT];
        let mut sum: u32 = 0;
        let mut i = 0;
        while i < self.entries.len() {
            let (category, weight) = self.entries[i];
            let slot = category as usize;
            if seen[slot] {
                return false;
            }
            seen[slot] = true;
            sum = sum.saturating_add(weight);
            i += 1;
        }
        let mut j = 0;
        while j < Category::COUNT {
            if !seen[j] {
                return false;
            }
            j += 1;
        }
        self.total > 0 && sum == self.total
    }

    pub fn weight(&self, category: Category) -> u32 {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, weight)| *weight)
            .unwrap_or(0)
    }

    pub fn probability(&self, category: Category) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.weight(category) as f64 / self.total as f64
    }

    /// Maps a sample `r` in `[0, total)` to its category.
    ///
    /// Falls back to `Lose` when no interval contains `r`, which only a
    /// malformed table can cause.
    pub fn category_for_sample(&self, r: u32) -> Category {
        let mut cumulative: u32 = 0;
        for &(category, weight) in self.entries {
            cumulative = cumulative.saturating_add(weight);
            if r < cumulative {
                return category;
            }
        }
        Category::Lose
    }

    /// Draws one outcome. An override short-circuits the sampler and leaves
    /// `rng` untouched.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        debug_override: Option<Category>,
        rng: &mut R,
    ) -> &'static PrizeOutcome {
        let category = match debug_override {
            Some(category) => category,
            None if self.total == 0 => Category::Lose,
            None => self.category_for_sample(rng.gen_range(0..self.total)),
        };
        category.outcome()
    }
}

/// 0.01% precision table used by the regular campaign.
pub const STANDARD_TABLE: WeightTable = WeightTable::new(
    &[
        (Category::Full, 1),
        (Category::Geisha, 99),
        (Category::Cashback100, 1000),
        (Category::RetryCredit, 0),
        (Category::Lose, 8900),
    ],
    10_000,
);

/// Campaign variant where a tenth of the draws hand out another spin.
pub const RETRY_CREDIT_TABLE: WeightTable = WeightTable::new(
    &[
        (Category::Full, 1),
        (Category::Geisha, 9),
        (Category::Cashback100, 100),
        (Category::RetryCredit, 100),
        (Category::Lose, 790),
    ],
    1_000,
);

const _: () = assert!(STANDARD_TABLE.is_well_formed());
const _: () = assert!(RETRY_CREDIT_TABLE.is_well_formed());

/// Which weight table a session draws from.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableVariant {
    #[default]
    Standard,
    RetryCredit,
}

impl TableVariant {
    pub fn table(self) -> &'static WeightTable {
        match self {
            Self::Standard => &STANDARD_TABLE,
            Self::RetryCredit => &RETRY_CREDIT_TABLE,
        }
    }

    /// Order in which the reel lays out prizes. Categories the table can
    /// never produce are left off the reel.
    pub fn reel_sequence(self) -> Vec<Category> {
        let base = [
            Category::Full,
            Category::Lose,
            Category::Geisha,
            Category::Cashback100,
            Category::RetryCredit,
        ];
        let table = self.table();
        base.into_iter()
            .filter(|category| *category == Category::Lose || table.weight(*category) > 0)
            .collect()
    }

    /// Whether `category` has a slot on this variant's reel.
    pub fn offers(self, category: Category) -> bool {
        self.reel_sequence().contains(&category)
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "retry" | "retry_credit" | "retry-credit" => Self::RetryCredit,
            _ => Self::Standard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    #[test]
    fn test_standard_table_partition_edges() {
        let table = STANDARD_TABLE;
        assert_eq!(table.category_for_sample(0), Category::Full);
        assert_eq!(table.category_for_sample(1), Category::Geisha);
        assert_eq!(table.category_for_sample(99), Category::Geisha);
        assert_eq!(table.category_for_sample(100), Category::Cashback100);
        assert_eq!(table.category_for_sample(1099), Category::Cashback100);
        assert_eq!(table.category_for_sample(1100), Category::Lose);
        assert_eq!(table.category_for_sample(9999), Category::Lose);
    }

    #[test]
    fn test_zero_weight_category_is_never_sampled() {
        for r in 0..STANDARD_TABLE.total() {
            assert_ne!(STANDARD_TABLE.category_for_sample(r), Category::RetryCredit);
        }
    }

    #[test]
    fn test_malformed_table_falls_back_to_lose() {
        static SHORT: [(Category, u32); 2] = [(Category::Full, 2), (Category::Geisha, 3)];
        let table = WeightTable::new(&SHORT, 10);
        assert!(!table.is_well_formed());
        assert_eq!(table.category_for_sample(4), Category::Geisha);
        assert_eq!(table.category_for_sample(7), Category::Lose);
    }

    #[test]
    fn test_duplicate_category_is_not_well_formed() {
        static DUPLICATE: [(Category, u32); 5] = [
            (Category::Full, 1),
            (Category::Full, 1),
            (Category::Cashback100, 1),
            (Category::RetryCredit, 1),
            (Category::Lose, 1),
        ];
        assert!(!WeightTable::new(&DUPLICATE, 5).is_well_formed());
    }

    #[test]
    fn test_override_wins_every_time_and_consumes_no_randomness() {
        for seed in 0..50u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut untouched = rng.clone();
            for category in Category::ALL {
                let outcome = STANDARD_TABLE.draw(Some(category), &mut rng);
                assert_eq!(outcome.category, category);
            }
            assert_eq!(rng.next_u64(), untouched.next_u64());
        }
    }

    #[test]
    fn test_draw_frequencies_match_weights() {
        // Chi-square goodness of fit, 3 degrees of freedom once the
        // zero-weight category is dropped; 16.27 is the p = 0.001 cutoff.
        const TRIALS: u32 = 200_000;
        let table = STANDARD_TABLE;
        let mut rng = StdRng::seed_from_u64(0x5eed_2024);
        let mut counts = [0u32; Category::COUNT];
        for _ in 0..TRIALS {
            counts[table.draw(None, &mut rng).category as usize] += 1;
        }

        let mut chi_square = 0.0;
        for &(category, weight) in table.entries() {
            let observed = counts[category as usize] as f64;
            if weight == 0 {
                assert_eq!(observed, 0.0);
                continue;
            }
            let expected = TRIALS as f64 * weight as f64 / table.total() as f64;
            chi_square += (observed - expected).powi(2) / expected;
        }
        assert!(chi_square < 16.27, "chi-square too large: {chi_square}");
    }

    #[test]
    fn test_retry_table_is_consistent() {
        assert_eq!(RETRY_CREDIT_TABLE.total(), 1_000);
        assert_eq!(RETRY_CREDIT_TABLE.weight(Category::RetryCredit), 100);
        assert!((RETRY_CREDIT_TABLE.probability(Category::Full) - 0.001).abs() < f64::EPSILON);
    }

    #[test]
    fn test_catalog_lookup_matches_category() {
        for category in Category::ALL {
            assert_eq!(category.outcome().category, category);
        }
        assert_eq!(Category::Cashback100.outcome().coupon_code, Some("KYQ4WE35"));
        assert_eq!(Category::Geisha.outcome().coupon_code, Some("WF45SJCN"));
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_string(&Category::Cashback100).unwrap(), "\"100\"");
        assert_eq!("geisha".parse::<Category>(), Ok(Category::Geisha));
        assert!("jackpot".parse::<Category>().is_err());
    }

    #[test]
    fn test_reel_sequence_hides_unreachable_categories() {
        assert_eq!(
            TableVariant::Standard.reel_sequence(),
            vec![Category::Full, Category::Lose, Category::Geisha, Category::Cashback100]
        );
        assert_eq!(TableVariant::RetryCredit.reel_sequence().len(), 5);
    }

    #[test]
    fn test_offers_matches_reel() {
        assert!(!TableVariant::Standard.offers(Category::RetryCredit));
        assert!(TableVariant::Standard.offers(Category::Lose));
        assert!(TableVariant::RetryCredit.offers(Category::RetryCredit));
    }
}
