//! Capital weights from instrument classification.
//!
//! Every sector gets an equal share of capital, split equally between the
//! groups in that sector, then equally between the instruments in a group.

use std::collections::{BTreeMap, HashMap};

use super::instrument::Classification;

pub fn allocate_weights<'a, I>(instruments: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = (&'a str, &'a Classification)>,
{
    let members: Vec<(&str, &Classification)> = instruments.into_iter().collect();

    let mut groups: HashMap<&str, HashMap<&str, usize>> = HashMap::new();
    for (_, class) in &members {
        *groups
            .entry(class.sector.as_str())
            .or_default()
            .entry(class.group.as_str())
            .or_default() += 1;
    }

    let sector_count = groups.len() as f64;
    members
        .iter()
        .map(|(symbol, class)| {
            let sector_groups = &groups[class.sector.as_str()];
            let group_size = sector_groups[class.group.as_str()] as f64;
            let weight = 1.0 / sector_count / sector_groups.len() as f64 / group_size;
            (symbol.to_string(), weight)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn classes() -> Vec<(&'static str, Classification)> {
        vec![
            ("ES", Classification::new("Equity", "US")),
            ("NQ", Classification::new("Equity", "US")),
            ("GC", Classification::new("Metals", "Precious")),
            ("SI", Classification::new("Metals", "Precious")),
            ("HG", Classification::new("Metals", "Industrial")),
        ]
    }

    #[test]
    fn hierarchical_weights() {
        let classes = classes();
        let weights = allocate_weights(classes.iter().map(|(s, c)| (*s, c)));
        assert_relative_eq!(weights["ES"], 0.25);
        assert_relative_eq!(weights["NQ"], 0.25);
        assert_relative_eq!(weights["GC"], 0.125);
        assert_relative_eq!(weights["SI"], 0.125);
        assert_relative_eq!(weights["HG"], 0.25);
    }

    #[test]
    fn weights_sum_to_one() {
        let classes = classes();
        let weights = allocate_weights(classes.iter().map(|(s, c)| (*s, c)));
        assert_relative_eq!(weights.values().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn single_instrument_gets_everything() {
        let class = Classification::new("Energies", "Oil");
        let weights = allocate_weights([("CL", &class)]);
        assert_relative_eq!(weights["CL"], 1.0);
    }

    #[test]
    fn empty_universe_is_empty() {
        let weights = allocate_weights(std::iter::empty());
        assert!(weights.is_empty());
    }
}
