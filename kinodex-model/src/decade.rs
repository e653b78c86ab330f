/// A decade bucket used by the `time` listing filter, e.g. `1990s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decade {
    start_year: i32,
}

impl Decade {
    /// Parse a label like `2010s`. Anything else is not a decade filter.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        let digits = label.strip_suffix('s')?;
        if digits.len() != 4 {
            return None;
        }
        let start_year: i32 = digits.parse().ok()?;
        if start_year % 10 != 0 {
            return None;
        }
        Some(Decade { start_year })
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start_year && year < self.start_year + 10
    }

    pub fn label(&self) -> String {
        format!("{}s", self.start_year)
    }
}

impl std::fmt::Display for Decade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s", self.start_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_round_decades_only() {
        assert_eq!(Decade::parse("1990s").unwrap().start_year(), 1990);
        assert_eq!(Decade::parse(" 2020s ").unwrap().start_year(), 2020);
        assert!(Decade::parse("1995s").is_none());
        assert!(Decade::parse("1990").is_none());
        assert!(Decade::parse("90s").is_none());
    }

    #[test]
    fn contains_is_half_open() {
        let d = Decade::parse("2010s").unwrap();
        assert!(d.contains(2010));
        assert!(d.contains(2019));
        assert!(!d.contains(2020));
        assert!(!d.contains(2009));
    }
}
