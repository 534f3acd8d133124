//! Summary statistics over any subset of hubs.

use indexmap::IndexMap;
use serde::Serialize;

use super::model::HubRow;

/// Label used when a category value is blank.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Default length of the country ranking.
pub const DEFAULT_TOP_COUNTRIES: usize = 10;

/// One entry of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Point-in-time summary of a row subset. Never retained by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsSnapshot {
    pub total: usize,
    pub geocoded: usize,
    pub geocoded_pct: u32,
    pub with_website: usize,
    pub with_website_pct: u32,
    pub with_email: usize,
    pub with_email_pct: u32,
    /// Most frequent countries, highest first, at most `top_n` entries.
    pub top_countries: Vec<CategoryCount>,
    pub hub_types: Vec<CategoryCount>,
    pub regions: Vec<CategoryCount>,
}

/// Summarize `rows` in a single pass.
///
/// Frequency tables are ordered by descending count; equal counts keep the
/// order in which the label was first seen. Blank categories count as
/// [`UNKNOWN_LABEL`].
pub fn summarize<'a, I>(rows: I, top_n: usize) -> AnalyticsSnapshot
where
    I: IntoIterator<Item = &'a HubRow>,
{
    let mut total = 0;
    let mut geocoded = 0;
    let mut with_website = 0;
    let mut with_email = 0;
    let mut countries = Tally::default();
    let mut hub_types = Tally::default();
    let mut regions = Tally::default();

    for row in rows {
        total += 1;
        geocoded += usize::from(row.is_geocoded());
        with_website += usize::from(!row.website.trim().is_empty());
        with_email += usize::from(!row.email.trim().is_empty());
        countries.add(&row.country);
        hub_types.add(&row.hub_type);
        regions.add(&row.region);
    }

    let mut top_countries = countries.into_ranked();
    top_countries.truncate(top_n);

    AnalyticsSnapshot {
        total,
        geocoded,
        geocoded_pct: percent(geocoded, total),
        with_website,
        with_website_pct: percent(with_website, total),
        with_email,
        with_email_pct: percent(with_email, total),
        top_countries,
        hub_types: hub_types.into_ranked(),
        regions: regions.into_ranked(),
    }
}

/// `count / total` as a whole percentage, rounded half away from zero.
/// Zero when `total` is zero.
pub fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    // Integer form of round(100 * count / total); exact at the .5 boundary.
    ((200 * count + total) / (2 * total)) as u32
}

/// Insertion-ordered frequency counter.
#[derive(Default)]
struct Tally<'a> {
    counts: IndexMap<&'a str, usize>,
}

impl<'a> Tally<'a> {
    fn add(&mut self, value: &'a str) {
        let label = match value.trim() {
            "" => UNKNOWN_LABEL,
            v => v,
        };
        *self.counts.entry(label).or_insert(0) += 1;
    }

    fn into_ranked(mut self) -> Vec<CategoryCount> {
        // Stable sort keeps first-occurrence order among ties.
        self.counts.sort_by(|_, a, _, b| b.cmp(a));
        self.counts
            .into_iter()
            .map(|(label, count)| CategoryCount {
                label: label.to_string(),
                count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{located, row};

    fn counts(table: &[CategoryCount]) -> Vec<(&str, usize)> {
        table.iter().map(|c| (c.label.as_str(), c.count)).collect()
    }

    #[test]
    fn empty_subset_has_zero_percentages() {
        let snap = summarize(std::iter::empty::<&HubRow>(), DEFAULT_TOP_COUNTRIES);
        assert_eq!(snap.total, 0);
        assert_eq!(snap.with_website_pct, 0);
        assert_eq!(snap.with_email_pct, 0);
        assert_eq!(snap.geocoded_pct, 0);
        assert!(snap.top_countries.is_empty());
        assert!(snap.hub_types.is_empty());
        assert!(snap.regions.is_empty());
    }

    #[test]
    fn counts_and_rounded_percentages() {
        let mut a = located(row(0, "a", "Kenya", "Lab"), -1.3, 36.8);
        a.website = "https://a.example".to_string();
        a.email = "a@example.org".to_string();
        let mut b = row(1, "b", "Kenya", "Lab");
        b.website = "https://b.example".to_string();
        let c = row(2, "c", "Ghana", "Incubator");
        let rows = [a, b, c];

        let snap = summarize(&rows, DEFAULT_TOP_COUNTRIES);
        assert_eq!(snap.total, 3);
        assert_eq!(snap.geocoded, 1);
        assert_eq!(snap.geocoded_pct, 33);
        assert_eq!(snap.with_website, 2);
        assert_eq!(snap.with_website_pct, 67);
        assert_eq!(snap.with_email, 1);
        assert_eq!(snap.with_email_pct, 33);
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(1, 200), 1);
        assert_eq!(percent(1, 201), 0);
        assert_eq!(percent(5, 5), 100);
        assert_eq!(percent(3, 0), 0);
    }

    #[test]
    fn percent_exact_halves_round_up() {
        assert_eq!(percent(29, 200), 15);
        assert_eq!(percent(57, 200), 29);
        assert_eq!(percent(1, 40), 3);
        assert_eq!(percent(7, 1000), 1);
        assert_eq!(percent(4, 1000), 0);
    }

    #[test]
    fn tally_ties_keep_first_seen_order_after_later_growth() {
        let rows = [
            row(0, "a", "", "Lab"),
            row(1, "b", "", "Hub"),
            row(2, "c", "", "Space"),
            row(3, "d", "", "Space"),
            row(4, "e", "", "Hub"),
        ];
        let snap = summarize(&rows, DEFAULT_TOP_COUNTRIES);
        assert_eq!(
            counts(&snap.hub_types),
            vec![("Hub", 2), ("Space", 2), ("Lab", 1)]
        );
    }

    #[test]
    fn country_ranking_breaks_ties_by_first_occurrence() {
        let rows = [
            row(0, "a", "Nigeria", ""),
            row(1, "b", "Ghana", ""),
            row(2, "c", "Kenya", ""),
            row(3, "d", "Ghana", ""),
            row(4, "e", "Kenya", ""),
            row(5, "f", "Egypt", ""),
        ];
        let snap = summarize(&rows, DEFAULT_TOP_COUNTRIES);
        assert_eq!(
            counts(&snap.top_countries),
            vec![("Ghana", 2), ("Kenya", 2), ("Nigeria", 1), ("Egypt", 1)]
        );
    }

    #[test]
    fn country_ranking_is_truncated() {
        let rows: Vec<HubRow> = (0..15)
            .map(|i| row(i, "hub", &format!("Country {i}"), "Lab"))
            .collect();
        let snap = summarize(&rows, DEFAULT_TOP_COUNTRIES);
        assert_eq!(snap.top_countries.len(), 10);
        assert_eq!(snap.top_countries[0].label, "Country 0");
        assert_eq!(snap.top_countries[9].label, "Country 9");

        let snap = summarize(&rows, 3);
        assert_eq!(snap.top_countries.len(), 3);
    }

    #[test]
    fn blank_types_and_regions_fold_to_unknown() {
        let mut a = row(0, "a", "Kenya", "");
        a.region = "Eastern Africa".to_string();
        let b = row(1, "b", "Kenya", "Lab");
        let c = row(2, "c", "", " ");
        let rows = [a, b, c];
        let snap = summarize(&rows, DEFAULT_TOP_COUNTRIES);
        assert_eq!(counts(&snap.hub_types), vec![("Unknown", 2), ("Lab", 1)]);
        assert_eq!(
            counts(&snap.regions),
            vec![("Unknown", 2), ("Eastern Africa", 1)]
        );
        assert_eq!(counts(&snap.top_countries), vec![("Kenya", 2), ("Unknown", 1)]);
    }

    #[test]
    fn input_is_left_untouched() {
        let rows = vec![row(0, "a", "Kenya", "Lab"), row(1, "b", "Ghana", "")];
        let before = rows.clone();
        let _ = summarize(&rows, DEFAULT_TOP_COUNTRIES);
        assert_eq!(rows, before);
    }
}
