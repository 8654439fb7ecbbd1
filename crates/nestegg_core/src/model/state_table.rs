//! Built-in state income tax database (2024 tax year, simplified)
//!
//! Each entry approximates the state's treatment of a retiree: one bracket
//! schedule, the standard deduction or personal exemption, the retirement
//! income exclusion for filers 65 and over, and the Social Security exemption.

use rustc_hash::FxHashMap;

use crate::error::ConfigError;
use crate::model::state_profile::{RetirementExclusion, StateTaxProfile};
use crate::model::tax::TaxBracket;

const INF: f64 = f64::INFINITY;

fn schedule(pairs: &[(f64, f64)]) -> Vec<TaxBracket> {
    pairs
        .iter()
        .map(|&(threshold, rate)| TaxBracket::new(threshold, rate))
        .collect()
}

/// Lookup table from jurisdiction name or abbreviation to tax profile
#[derive(Debug, Clone, Default)]
pub struct StateTaxTable {
    profiles: Vec<StateTaxProfile>,
    index: FxHashMap<String, usize>,
}

impl StateTaxTable {
    #[must_use]
    pub fn new(profiles: Vec<StateTaxProfile>) -> Self {
        let mut index = FxHashMap::default();
        for (i, profile) in profiles.iter().enumerate() {
            index.insert(normalize(&profile.name), i);
            index.insert(normalize(&profile.abbreviation), i);
        }
        Self { profiles, index }
    }

    /// Case-insensitive lookup by full name ("New York") or abbreviation ("ny")
    pub fn lookup(&self, name: &str) -> Option<&StateTaxProfile> {
        self.index
            .get(&normalize(name))
            .and_then(|&i| self.profiles.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateTaxProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Every configuration defect in the table
    pub fn validate(&self) -> Vec<ConfigError> {
        self.profiles
            .iter()
            .filter_map(|p| p.validate().err())
            .collect()
    }

    #[must_use]
    pub fn us_2024() -> Self {
        use RetirementExclusion::{Amount, Full};

        let profiles = vec![
            StateTaxProfile::progressive(
                "Alabama",
                "AL",
                schedule(&[(500.0, 0.02), (3_000.0, 0.04), (INF, 0.05)]),
                2_500.0,
                7_500.0,
            )
            .with_retirement_exclusion(Amount(6_000.0)),
            StateTaxProfile::no_tax("Alaska", "AK"),
            StateTaxProfile::flat("Arizona", "AZ", 0.025, 14_600.0, 29_200.0),
            StateTaxProfile::progressive(
                "Arkansas",
                "AR",
                schedule(&[(4_400.0, 0.02), (8_800.0, 0.04), (INF, 0.044)]),
                2_340.0,
                4_680.0,
            )
            .with_retirement_exclusion(Amount(6_000.0)),
            StateTaxProfile::progressive(
                "California",
                "CA",
                schedule(&[
                    (10_756.0, 0.01),
                    (25_499.0, 0.02),
                    (40_245.0, 0.04),
                    (55_866.0, 0.06),
                    (70_606.0, 0.08),
                    (360_659.0, 0.093),
                    (432_787.0, 0.103),
                    (721_314.0, 0.113),
                    (INF, 0.123),
                ]),
                5_540.0,
                11_080.0,
            ),
            StateTaxProfile::flat("Colorado", "CO", 0.044, 14_600.0, 29_200.0)
                .with_retirement_exclusion(Amount(24_000.0)),
            StateTaxProfile::progressive(
                "Connecticut",
                "CT",
                schedule(&[
                    (10_000.0, 0.02),
                    (50_000.0, 0.045),
                    (100_000.0, 0.055),
                    (200_000.0, 0.06),
                    (250_000.0, 0.065),
                    (500_000.0, 0.069),
                    (INF, 0.0699),
                ]),
                15_000.0,
                24_000.0,
            ),
            StateTaxProfile::progressive(
                "Delaware",
                "DE",
                schedule(&[
                    (2_000.0, 0.0),
                    (5_000.0, 0.022),
                    (10_000.0, 0.039),
                    (20_000.0, 0.048),
                    (25_000.0, 0.052),
                    (60_000.0, 0.0555),
                    (INF, 0.066),
                ]),
                3_250.0,
                6_500.0,
            )
            .with_retirement_exclusion(Amount(12_500.0)),
            StateTaxProfile::progressive(
                "District of Columbia",
                "DC",
                schedule(&[
                    (10_000.0, 0.04),
                    (40_000.0, 0.06),
                    (60_000.0, 0.065),
                    (250_000.0, 0.085),
                    (500_000.0, 0.0925),
                    (1_000_000.0, 0.0975),
                    (INF, 0.1075),
                ]),
                14_600.0,
                29_200.0,
            ),
            StateTaxProfile::no_tax("Florida", "FL"),
            StateTaxProfile::flat("Georgia", "GA", 0.0539, 12_000.0, 24_000.0)
                .with_retirement_exclusion(Amount(65_000.0)),
            StateTaxProfile::progressive(
                "Hawaii",
                "HI",
                schedule(&[
                    (2_400.0, 0.014),
                    (4_800.0, 0.032),
                    (9_600.0, 0.055),
                    (14_400.0, 0.064),
                    (19_200.0, 0.068),
                    (24_000.0, 0.072),
                    (36_000.0, 0.076),
                    (48_000.0, 0.079),
                    (150_000.0, 0.0825),
                    (175_000.0, 0.09),
                    (200_000.0, 0.10),
                    (INF, 0.11),
                ]),
                2_200.0,
                4_400.0,
            ),
            StateTaxProfile::flat("Idaho", "ID", 0.058, 14_600.0, 29_200.0),
            StateTaxProfile::flat("Illinois", "IL", 0.0495, 2_775.0, 5_550.0)
                .with_retirement_exclusion(Full),
            StateTaxProfile::flat("Indiana", "IN", 0.0305, 1_000.0, 2_000.0),
            StateTaxProfile::flat("Iowa", "IA", 0.038, 0.0, 0.0).with_retirement_exclusion(Full),
            StateTaxProfile::progressive(
                "Kansas",
                "KS",
                schedule(&[(23_000.0, 0.052), (INF, 0.0558)]),
                3_605.0,
                8_240.0,
            ),
            StateTaxProfile::flat("Kentucky", "KY", 0.04, 3_160.0, 6_320.0)
                .with_retirement_exclusion(Amount(31_110.0)),
            StateTaxProfile::flat("Louisiana", "LA", 0.03, 12_500.0, 25_000.0)
                .with_retirement_exclusion(Amount(6_000.0)),
            StateTaxProfile::progressive(
                "Maine",
                "ME",
                schedule(&[(26_050.0, 0.058), (61_600.0, 0.0675), (INF, 0.0715)]),
                14_600.0,
                29_200.0,
            )
            .with_retirement_exclusion(Amount(35_000.0)),
            StateTaxProfile::progressive(
                "Maryland",
                "MD",
                schedule(&[
                    (1_000.0, 0.02),
                    (2_000.0, 0.03),
                    (3_000.0, 0.04),
                    (100_000.0, 0.0475),
                    (125_000.0, 0.05),
                    (150_000.0, 0.0525),
                    (250_000.0, 0.055),
                    (INF, 0.0575),
                ]),
                2_550.0,
                5_150.0,
            )
            .with_retirement_exclusion(Amount(39_500.0)),
            StateTaxProfile::flat("Massachusetts", "MA", 0.05, 4_400.0, 8_800.0),
            StateTaxProfile::flat("Michigan", "MI", 0.0425, 5_600.0, 11_200.0),
            StateTaxProfile::progressive(
                "Minnesota",
                "MN",
                schedule(&[
                    (31_690.0, 0.0535),
                    (104_090.0, 0.068),
                    (193_240.0, 0.0785),
                    (INF, 0.0985),
                ]),
                14_575.0,
                29_150.0,
            ),
            StateTaxProfile::flat("Mississippi", "MS", 0.047, 8_300.0, 16_600.0)
                .with_retirement_exclusion(Full),
            StateTaxProfile::progressive(
                "Missouri",
                "MO",
                schedule(&[
                    (1_273.0, 0.0),
                    (2_546.0, 0.02),
                    (3_819.0, 0.025),
                    (5_092.0, 0.03),
                    (6_365.0, 0.035),
                    (7_638.0, 0.04),
                    (8_911.0, 0.045),
                    (INF, 0.048),
                ]),
                14_600.0,
                29_200.0,
            )
            .with_retirement_exclusion(Amount(6_000.0)),
            StateTaxProfile::progressive(
                "Montana",
                "MT",
                schedule(&[(20_500.0, 0.047), (INF, 0.059)]),
                14_600.0,
                29_200.0,
            )
            .with_social_security_exempt_pct(15.0),
            StateTaxProfile::progressive(
                "Nebraska",
                "NE",
                schedule(&[
                    (3_700.0, 0.0246),
                    (22_170.0, 0.0351),
                    (35_730.0, 0.0501),
                    (INF, 0.0584),
                ]),
                8_300.0,
                16_600.0,
            ),
            StateTaxProfile::no_tax("Nevada", "NV"),
            StateTaxProfile::no_tax("New Hampshire", "NH"),
            StateTaxProfile::progressive(
                "New Jersey",
                "NJ",
                schedule(&[
                    (20_000.0, 0.014),
                    (35_000.0, 0.0175),
                    (40_000.0, 0.035),
                    (75_000.0, 0.05525),
                    (500_000.0, 0.0637),
                    (1_000_000.0, 0.0897),
                    (INF, 0.1075),
                ]),
                1_000.0,
                2_000.0,
            )
            .with_retirement_exclusion(Amount(75_000.0)),
            StateTaxProfile::progressive(
                "New Mexico",
                "NM",
                schedule(&[
                    (5_500.0, 0.017),
                    (11_000.0, 0.032),
                    (16_000.0, 0.047),
                    (210_000.0, 0.049),
                    (INF, 0.059),
                ]),
                14_600.0,
                29_200.0,
            ),
            StateTaxProfile::progressive(
                "New York",
                "NY",
                schedule(&[
                    (8_500.0, 0.04),
                    (11_700.0, 0.045),
                    (13_900.0, 0.0525),
                    (80_650.0, 0.055),
                    (215_400.0, 0.06),
                    (1_077_550.0, 0.0685),
                    (5_000_000.0, 0.0965),
                    (25_000_000.0, 0.103),
                    (INF, 0.109),
                ]),
                8_000.0,
                16_050.0,
            )
            .with_retirement_exclusion(Amount(20_000.0)),
            StateTaxProfile::flat("North Carolina", "NC", 0.045, 12_750.0, 25_500.0),
            StateTaxProfile::progressive(
                "North Dakota",
                "ND",
                schedule(&[(47_150.0, 0.0), (238_200.0, 0.0195), (INF, 0.025)]),
                14_600.0,
                29_200.0,
            ),
            StateTaxProfile::progressive(
                "Ohio",
                "OH",
                schedule(&[(26_050.0, 0.0), (100_000.0, 0.0275), (INF, 0.035)]),
                2_400.0,
                4_800.0,
            ),
            StateTaxProfile::progressive(
                "Oklahoma",
                "OK",
                schedule(&[
                    (1_000.0, 0.0025),
                    (2_500.0, 0.0075),
                    (3_750.0, 0.0175),
                    (4_900.0, 0.0275),
                    (7_200.0, 0.0375),
                    (INF, 0.0475),
                ]),
                6_350.0,
                12_700.0,
            )
            .with_retirement_exclusion(Amount(10_000.0)),
            StateTaxProfile::progressive(
                "Oregon",
                "OR",
                schedule(&[
                    (4_300.0, 0.0475),
                    (10_750.0, 0.0675),
                    (125_000.0, 0.0875),
                    (INF, 0.099),
                ]),
                2_745.0,
                5_495.0,
            ),
            StateTaxProfile::flat("Pennsylvania", "PA", 0.0307, 0.0, 0.0)
                .with_retirement_exclusion(Full),
            StateTaxProfile::progressive(
                "Rhode Island",
                "RI",
                schedule(&[(77_450.0, 0.0375), (176_050.0, 0.0475), (INF, 0.0599)]),
                10_550.0,
                21_150.0,
            )
            .with_retirement_exclusion(Amount(20_000.0)),
            StateTaxProfile::progressive(
                "South Carolina",
                "SC",
                schedule(&[(3_460.0, 0.0), (17_330.0, 0.03), (INF, 0.062)]),
                14_600.0,
                29_200.0,
            )
            .with_retirement_exclusion(Amount(10_000.0)),
            StateTaxProfile::no_tax("South Dakota", "SD"),
            StateTaxProfile::no_tax("Tennessee", "TN"),
            StateTaxProfile::no_tax("Texas", "TX"),
            StateTaxProfile::flat("Utah", "UT", 0.0465, 0.0, 0.0)
                .with_social_security_exempt_pct(0.0),
            StateTaxProfile::progressive(
                "Vermont",
                "VT",
                schedule(&[
                    (45_400.0, 0.0335),
                    (110_050.0, 0.066),
                    (229_550.0, 0.076),
                    (INF, 0.0875),
                ]),
                7_400.0,
                14_850.0,
            )
            .with_social_security_exempt_pct(0.0),
            StateTaxProfile::progressive(
                "Virginia",
                "VA",
                schedule(&[
                    (3_000.0, 0.02),
                    (5_000.0, 0.03),
                    (17_000.0, 0.05),
                    (INF, 0.0575),
                ]),
                8_000.0,
                16_000.0,
            )
            .with_retirement_exclusion(Amount(12_000.0)),
            StateTaxProfile::no_tax("Washington", "WA"),
            StateTaxProfile::progressive(
                "West Virginia",
                "WV",
                schedule(&[
                    (10_000.0, 0.0236),
                    (25_000.0, 0.0315),
                    (40_000.0, 0.0354),
                    (60_000.0, 0.0472),
                    (INF, 0.0512),
                ]),
                2_000.0,
                4_000.0,
            ),
            StateTaxProfile::progressive(
                "Wisconsin",
                "WI",
                schedule(&[
                    (14_320.0, 0.035),
                    (28_640.0, 0.044),
                    (315_310.0, 0.053),
                    (INF, 0.0765),
                ]),
                13_230.0,
                24_490.0,
            ),
            StateTaxProfile::no_tax("Wyoming", "WY"),
        ];

        Self::new(profiles)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::state_profile::StateTaxMethod;

    #[test]
    fn test_table_covers_fifty_states_and_dc() {
        let table = StateTaxTable::us_2024();
        assert_eq!(table.len(), 51);
    }

    #[test]
    fn test_every_profile_is_well_formed() {
        let table = StateTaxTable::us_2024();
        let defects = table.validate();
        assert!(defects.is_empty(), "malformed state profiles: {defects:?}");
    }

    #[test]
    fn test_lookup_by_name_and_abbreviation() {
        let table = StateTaxTable::us_2024();
        let by_name = table.lookup("massachusetts").unwrap();
        let by_abbrev = table.lookup(" MA ").unwrap();
        assert_eq!(by_name, by_abbrev);
        assert_eq!(by_name.method, StateTaxMethod::Flat { rate: 0.05 });
        assert_eq!(table.lookup("  new york ").map(|p| p.abbreviation.as_str()), Some("NY"));
        assert_eq!(table.lookup("ny").map(|p| p.name.as_str()), Some("New York"));
        assert!(table.lookup("Atlantis").is_none());
    }

    #[test]
    fn test_validate_flags_bracketless_progressive_profile() {
        let table = StateTaxTable::new(vec![
            StateTaxProfile::progressive("Broken", "BR", vec![], 0.0, 0.0),
            StateTaxProfile::no_tax("Texas", "TX"),
        ]);
        let defects = table.validate();
        assert_eq!(defects.len(), 1);
        assert!(defects[0].to_string().contains("Broken"));
    }
}
