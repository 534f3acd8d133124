use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RegionTableError;

// ---------------------------------------------------------------------------
// Region – the five sub-continental groupings plus a sentinel
// ---------------------------------------------------------------------------

/// A sub-continental grouping used for filtering and aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "Northern Africa")]
    NorthernAfrica,
    #[serde(rename = "Western Africa")]
    WesternAfrica,
    #[serde(rename = "Eastern Africa")]
    EasternAfrica,
    #[serde(rename = "Central Africa")]
    CentralAfrica,
    #[serde(rename = "Southern Africa")]
    SouthernAfrica,
    /// Sentinel for country names no rule recognises.
    Unknown,
}

impl Region {
    /// Every region a country can be classified into (excludes `Unknown`).
    pub const CLASSIFIED: [Region; 5] = [
        Region::NorthernAfrica,
        Region::WesternAfrica,
        Region::EasternAfrica,
        Region::CentralAfrica,
        Region::SouthernAfrica,
    ];

    /// Human-readable label, as stored in the `region` column.
    pub fn label(self) -> &'static str {
        match self {
            Region::NorthernAfrica => "Northern Africa",
            Region::WesternAfrica => "Western Africa",
            Region::EasternAfrica => "Eastern Africa",
            Region::CentralAfrica => "Central Africa",
            Region::SouthernAfrica => "Southern Africa",
            Region::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Built-in classification data
// ---------------------------------------------------------------------------

const NORTHERN_AFRICA: &[&str] = &[
    "algeria",
    "egypt",
    "libya",
    "morocco",
    "sudan",
    "tunisia",
    "western sahara",
];

const WESTERN_AFRICA: &[&str] = &[
    "benin",
    "burkina faso",
    "cabo verde",
    "cape verde",
    "côte d'ivoire",
    "cote d'ivoire",
    "ivory coast",
    "gambia",
    "the gambia",
    "ghana",
    "guinea",
    "guinea-bissau",
    "liberia",
    "mali",
    "mauritania",
    "niger",
    "nigeria",
    "saint helena",
    "senegal",
    "sierra leone",
    "togo",
];

const EASTERN_AFRICA: &[&str] = &[
    "burundi",
    "comoros",
    "djibouti",
    "eritrea",
    "ethiopia",
    "kenya",
    "madagascar",
    "malawi",
    "mauritius",
    "mayotte",
    "mozambique",
    "réunion",
    "reunion",
    "rwanda",
    "seychelles",
    "somalia",
    "somaliland",
    "south sudan",
    "tanzania",
    "uganda",
    "zambia",
    "zimbabwe",
];

const CENTRAL_AFRICA: &[&str] = &[
    "angola",
    "cameroon",
    "central african republic",
    "chad",
    "congo",
    "republic of the congo",
    "congo-brazzaville",
    "democratic republic of the congo",
    "dr congo",
    "drc",
    "congo-kinshasa",
    "equatorial guinea",
    "gabon",
    "são tomé and príncipe",
    "sao tome and principe",
];

const SOUTHERN_AFRICA: &[&str] = &[
    "botswana",
    "eswatini",
    "swaziland",
    "lesotho",
    "namibia",
    "south africa",
];

/// Ordered fallback rules. Earlier rules shadow later ones, so the more
/// specific needle of any overlapping pair comes first.
const HEURISTICS: &[(&str, Region)] = &[
    ("south sudan", Region::EasternAfrica),
    ("south-sudan", Region::EasternAfrica),
    ("sudan, south", Region::EasternAfrica),
    ("s. sudan", Region::EasternAfrica),
    ("soudan du sud", Region::EasternAfrica),
    ("sudan", Region::NorthernAfrica),
    ("soudan", Region::NorthernAfrica),
    ("equatorial guinea", Region::CentralAfrica),
    ("guinea ecuatorial", Region::CentralAfrica),
    ("guinée équatoriale", Region::CentralAfrica),
    ("guinee equatoriale", Region::CentralAfrica),
    ("equatorial", Region::CentralAfrica),
    ("ecuatorial", Region::CentralAfrica),
    ("équatoriale", Region::CentralAfrica),
    ("guinea", Region::WesternAfrica),
    ("guinée", Region::WesternAfrica),
    ("guinee", Region::WesternAfrica),
    ("guiné", Region::WesternAfrica),
    ("central african", Region::CentralAfrica),
    ("centrafrique", Region::CentralAfrica),
    ("south africa", Region::SouthernAfrica),
    ("africa, south", Region::SouthernAfrica),
    ("south west africa", Region::SouthernAfrica),
    ("afrique du sud", Region::SouthernAfrica),
    ("congo", Region::CentralAfrica),
    ("zaire", Region::CentralAfrica),
    ("zaïre", Region::CentralAfrica),
    ("somali", Region::EasternAfrica),
    ("ivoire", Region::WesternAfrica),
    ("ivory", Region::WesternAfrica),
    ("verde", Region::WesternAfrica),
    ("cap-vert", Region::WesternAfrica),
    ("gambi", Region::WesternAfrica),
    ("niger", Region::WesternAfrica),
    ("burkina", Region::WesternAfrica),
    ("upper volta", Region::WesternAfrica),
    ("haute-volta", Region::WesternAfrica),
    ("dahomey", Region::WesternAfrica),
    ("bénin", Region::WesternAfrica),
    ("benin", Region::WesternAfrica),
    ("gold coast", Region::WesternAfrica),
    ("ghana", Region::WesternAfrica),
    ("sénégal", Region::WesternAfrica),
    ("senegal", Region::WesternAfrica),
    ("sierra leone", Region::WesternAfrica),
    ("liberia", Region::WesternAfrica),
    ("mauritani", Region::WesternAfrica),
    ("mali", Region::WesternAfrica),
    ("togo", Region::WesternAfrica),
    ("sahara", Region::NorthernAfrica),
    ("sahrawi", Region::NorthernAfrica),
    ("maroc", Region::NorthernAfrica),
    ("morocc", Region::NorthernAfrica),
    ("algérie", Region::NorthernAfrica),
    ("algeri", Region::NorthernAfrica),
    ("tunis", Region::NorthernAfrica),
    ("libya", Region::NorthernAfrica),
    ("libye", Region::NorthernAfrica),
    ("égypte", Region::NorthernAfrica),
    ("egypt", Region::NorthernAfrica),
    ("tanzania", Region::EasternAfrica),
    ("tanganyika", Region::EasternAfrica),
    ("zanzibar", Region::EasternAfrica),
    ("abyssinia", Region::EasternAfrica),
    ("éthiopie", Region::EasternAfrica),
    ("ethiopi", Region::EasternAfrica),
    ("érythrée", Region::EasternAfrica),
    ("eritre", Region::EasternAfrica),
    ("rhodesia", Region::EasternAfrica),
    ("nyasaland", Region::EasternAfrica),
    ("kenya", Region::EasternAfrica),
    ("uganda", Region::EasternAfrica),
    ("rwanda", Region::EasternAfrica),
    ("burundi", Region::EasternAfrica),
    ("madagas", Region::EasternAfrica),
    ("mozambi", Region::EasternAfrica),
    ("comor", Region::EasternAfrica),
    ("maurice", Region::EasternAfrica),
    ("mauritius", Region::EasternAfrica),
    ("réunion", Region::EasternAfrica),
    ("seychel", Region::EasternAfrica),
    ("djibouti", Region::EasternAfrica),
    ("zambi", Region::EasternAfrica),
    ("zimbabwe", Region::EasternAfrica),
    ("malawi", Region::EasternAfrica),
    ("cameroun", Region::CentralAfrica),
    ("cameroon", Region::CentralAfrica),
    ("chad", Region::CentralAfrica),
    ("gabon", Region::CentralAfrica),
    ("angola", Region::CentralAfrica),
    ("tomé", Region::CentralAfrica),
    ("tome", Region::CentralAfrica),
    ("príncipe", Region::CentralAfrica),
    ("principe", Region::CentralAfrica),
    ("swazi", Region::SouthernAfrica),
    ("eswatini", Region::SouthernAfrica),
    ("botswana", Region::SouthernAfrica),
    ("bechuanaland", Region::SouthernAfrica),
    ("lesotho", Region::SouthernAfrica),
    ("basutoland", Region::SouthernAfrica),
    ("namibi", Region::SouthernAfrica),
];

/// The curated country sets shipped with the crate.
pub fn builtin_sets() -> Vec<RegionSet> {
    [
        (Region::NorthernAfrica, NORTHERN_AFRICA),
        (Region::WesternAfrica, WESTERN_AFRICA),
        (Region::EasternAfrica, EASTERN_AFRICA),
        (Region::CentralAfrica, CENTRAL_AFRICA),
        (Region::SouthernAfrica, SOUTHERN_AFRICA),
    ]
    .into_iter()
    .map(|(region, countries)| RegionSet {
        region,
        countries: countries.iter().map(|c| c.to_string()).collect(),
    })
    .collect()
}

/// The ordered heuristic rules shipped with the crate.
pub fn builtin_heuristics() -> Vec<HeuristicRule> {
    HEURISTICS
        .iter()
        .map(|&(pattern, region)| HeuristicRule {
            pattern: pattern.to_string(),
            region,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// RegionTable – validated classification data
// ---------------------------------------------------------------------------

/// One curated set: every listed country belongs to `region`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSet {
    pub region: Region,
    pub countries: Vec<String>,
}

/// Fallback rule: a country containing `pattern` belongs to `region`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicRule {
    pub pattern: String,
    pub region: Region,
}

/// Serialized form of a [`RegionTable`], as written in a config file.
///
/// Custom sets are merged with the built-in ones (when `include_builtin`
/// holds) and custom heuristics run before the built-in heuristics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegionTableSpec {
    pub include_builtin: bool,
    pub sets: Vec<RegionSet>,
    pub heuristics: Vec<HeuristicRule>,
}

impl Default for RegionTableSpec {
    fn default() -> Self {
        Self {
            include_builtin: true,
            sets: Vec::new(),
            heuristics: Vec::new(),
        }
    }
}

/// Country → region lookup: exact membership in disjoint curated sets,
/// then ordered substring heuristics, then [`Region::Unknown`].
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RegionTableSpec")]
pub struct RegionTable {
    exact: HashMap<String, Region>,
    heuristics: Vec<HeuristicRule>,
}

impl RegionTable {
    /// Build a table, rejecting sets that share a country and rules that
    /// could never classify anything meaningfully.
    pub fn new(
        sets: impl IntoIterator<Item = RegionSet>,
        heuristics: impl IntoIterator<Item = HeuristicRule>,
    ) -> Result<Self, RegionTableError> {
        let mut exact: HashMap<String, Region> = HashMap::new();
        for set in sets {
            for country in &set.countries {
                let key = normalize_country(country);
                if set.region == Region::Unknown {
                    return Err(RegionTableError::UnknownTarget { entry: key });
                }
                match exact.get(&key) {
                    Some(&existing) if existing != set.region => {
                        return Err(RegionTableError::OverlappingCountry {
                            country: key,
                            first: existing,
                            second: set.region,
                        });
                    }
                    _ => {
                        exact.insert(key, set.region);
                    }
                }
            }
        }

        let heuristics = heuristics
            .into_iter()
            .map(|rule| {
                let pattern = normalize_country(&rule.pattern);
                if pattern.is_empty() {
                    return Err(RegionTableError::EmptyHeuristic {
                        region: rule.region,
                    });
                }
                if rule.region == Region::Unknown {
                    return Err(RegionTableError::UnknownTarget { entry: pattern });
                }
                Ok(HeuristicRule {
                    pattern,
                    region: rule.region,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { exact, heuristics })
    }

    /// The table shipped with the crate.
    ///
    /// The built-in data is checked for disjointness by the test suite, so
    /// this skips validation and cannot fail.
    pub fn builtin() -> Self {
        let exact = builtin_sets()
            .into_iter()
            .flat_map(|set| {
                let region = set.region;
                set.countries
                    .into_iter()
                    .map(move |c| (normalize_country(&c), region))
            })
            .collect();
        Self {
            exact,
            heuristics: builtin_heuristics(),
        }
    }

    /// Classify a free-text country name.
    pub fn classify(&self, country: &str) -> Region {
        let key = normalize_country(country);
        if key.is_empty() {
            return Region::Unknown;
        }
        if let Some(&region) = self.exact.get(&key) {
            return region;
        }
        self.heuristics
            .iter()
            .find(|rule| key.contains(rule.pattern.as_str()))
            .map_or(Region::Unknown, |rule| rule.region)
    }

    #[cfg(test)]
    fn exact_len(&self) -> usize {
        self.exact.len()
    }
}

impl Default for RegionTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<RegionTableSpec> for RegionTable {
    type Error = RegionTableError;

    fn try_from(input: RegionTableSpec) -> Result<Self, Self::Error> {
        let (mut sets, mut heuristics) = (input.sets, input.heuristics);
        if input.include_builtin {
            sets.extend(builtin_sets());
            heuristics.extend(builtin_heuristics());
        }
        Self::new(sets, heuristics)
    }
}

fn normalize_country(s: &str) -> String {
    s.trim().to_lowercase()
}
