//! The fixed set of legal frameworks a case can be analyzed under.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LawSystem {
    Saudi,
    Egyptian,
    Emirati,
    Kuwaiti,
    Qatari,
    Jordanian,
}

impl LawSystem {
    /// Arabic display label, also used verbatim in the analysis prompt.
    pub fn label(&self) -> &'static str {
        match self {
            LawSystem::Saudi => "النظام السعودي",
            LawSystem::Egyptian => "القانون المصري",
            LawSystem::Emirati => "القانون الإماراتي",
            LawSystem::Kuwaiti => "القانون الكويتي",
            LawSystem::Qatari => "القانون القطري",
            LawSystem::Jordanian => "القانون الأردني",
        }
    }

    /// ASCII identifier for log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            LawSystem::Saudi => "saudi",
            LawSystem::Egyptian => "egyptian",
            LawSystem::Emirati => "emirati",
            LawSystem::Kuwaiti => "kuwaiti",
            LawSystem::Qatari => "qatari",
            LawSystem::Jordanian => "jordanian",
        }
    }

    pub fn all() -> Vec<LawSystem> {
        vec![
            LawSystem::Saudi,
            LawSystem::Egyptian,
            LawSystem::Emirati,
            LawSystem::Kuwaiti,
            LawSystem::Qatari,
            LawSystem::Jordanian,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_system_has_distinct_labels() {
        let all = LawSystem::all();
        for (i, a) in all.iter().enumerate() {
            assert!(!a.label().is_empty());
            assert!(!a.as_str().is_empty());
            for b in all.iter().skip(i + 1) {
                assert_ne!(a.label(), b.label());
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }
}
