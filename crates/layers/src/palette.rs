//! ColorBrewer "Spectral" diverging schemes (Cynthia Brewer, Apache 2.0),
//! as shipped by d3-scale-chromatic.

const SPECTRAL: [&[&str]; 9] = [
    &["#fc8d59", "#ffffbf", "#99d594"],
    &["#d7191c", "#fdae61", "#abdda4", "#2b83ba"],
    &["#d7191c", "#fdae61", "#ffffbf", "#abdda4", "#2b83ba"],
    &["#d53e4f", "#fc8d59", "#fee08b", "#e6f598", "#99d594", "#3288bd"],
    &["#d53e4f", "#fc8d59", "#fee08b", "#ffffbf", "#e6f598", "#99d594", "#3288bd"],
    &["#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#e6f598", "#abdda4", "#66c2a5", "#3288bd"],
    &["#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#e6f598", "#abdda4", "#66c2a5", "#3288bd"],
    &["#9e0142", "#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#e6f598", "#abdda4", "#66c2a5", "#3288bd", "#5e4fa2"],
    &["#9e0142", "#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#e6f598", "#abdda4", "#66c2a5", "#3288bd", "#5e4fa2"],
];

pub const MIN_SPECTRAL: usize = 3;
pub const MAX_SPECTRAL: usize = 11;

/// Spectral colors for `k` categories.
///
/// Below three categories the leading colors of the three-color scheme are
/// used; above eleven the eleven-color scheme repeats.
pub fn spectral(k: usize) -> Vec<&'static str> {
    match k {
        0 => Vec::new(),
        k if k < MIN_SPECTRAL => SPECTRAL[0][..k].to_vec(),
        k if k <= MAX_SPECTRAL => SPECTRAL[k - MIN_SPECTRAL].to_vec(),
        k => SPECTRAL[MAX_SPECTRAL - MIN_SPECTRAL]
            .iter()
            .copied()
            .cycle()
            .take(k)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::spectral;

    #[test]
    fn scheme_sizes_match_category_count() {
        for k in 0..=20 {
            assert_eq!(spectral(k).len(), k);
        }
    }

    #[test]
    fn known_schemes() {
        assert_eq!(spectral(3), vec!["#fc8d59", "#ffffbf", "#99d594"]);
        assert_eq!(spectral(7)[3], "#ffffbf");
        assert_eq!(spectral(11)[0], "#9e0142");
        assert_eq!(spectral(11)[10], "#5e4fa2");
    }

    #[test]
    fn small_and_large_counts_fall_back() {
        assert_eq!(spectral(1), vec!["#fc8d59"]);
        assert_eq!(spectral(2), vec!["#fc8d59", "#ffffbf"]);
        let twelve = spectral(12);
        assert_eq!(twelve[11], twelve[0]);
    }
}
