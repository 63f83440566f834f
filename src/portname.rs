//! Короткие имена портов для отображения.
//!
//! Правила проверяются по порядку, срабатывает первое совпавшее. Более
//! конкретные шаблоны стоят раньше общих, иначе `Gi1/0/24` превратился бы
//! в номер слота.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Шаблон и способ достать из него короткое имя
pub struct Rule {
    pub name: &'static str,
    pub pattern: Regex,
    extract: fn(&Captures<'_>) -> String,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, extract: fn(&Captures<'_>) -> String) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("шаблон правила имени порта"),
            extract,
        }
    }

    /// Короткое имя, если правило подходит
    pub fn apply(&self, name: &str) -> Option<String> {
        self.pattern.captures(name).map(|caps| (self.extract)(&caps))
    }
}

fn first(caps: &Captures<'_>) -> String {
    caps[1].to_string()
}

fn sfp(caps: &Captures<'_>) -> String {
    format!("s{}", &caps[1])
}

pub static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new("slot-port", r"Slot:\s*\d+\s*Port:\s*(\d+)", first),
        Rule::new("port", r"Port\s*:?\s*(\d+)", first),
        Rule::new("sfp", r"SFP\+?(\d+)", sfp),
        Rule::new(
            "long-3",
            r"(?i)(?:GigabitEthernet|TenGigabitEthernet|FastEthernet)\s*\d+/\d+/(\d+)",
            first,
        ),
        Rule::new(
            "long-2",
            r"(?i)(?:GigabitEthernet|TenGigabitEthernet|FastEthernet)\s*\d+/(\d+)",
            first,
        ),
        Rule::new(
            "long-1",
            r"(?i)(?:GigabitEthernet|TenGigabitEthernet|FastEthernet)\s*(\d+)$",
            first,
        ),
        Rule::new("short-3", r"(?i)(?:Gi|Te|Fa)\s*\d+/\d+/(\d+)", first),
        Rule::new("short-2", r"(?i)(?:Gi|Te|Fa)\s*\d+/(\d+)", first),
        Rule::new("short-1", r"(?i)(?:Gi|Te|Fa)\s*(\d+)$", first),
        Rule::new("huawei-3", r"(?i)(?:GE|XGE)\s*\d+/\d+/(\d+)", first),
        Rule::new("juniper-3", r"(?i)(?:ge|xe|et)-\d+/\d+/(\d+)", first),
    ]
});

/// Имя для отображения; если ни одно правило не подошло, возвращается исходное
pub fn normalize(name: &str) -> String {
    RULES
        .iter()
        .find_map(|rule| rule.apply(name))
        .unwrap_or_else(|| name.to_string())
}

/// Имя первого сработавшего правила
pub fn matching_rule(name: &str) -> Option<&'static str> {
    RULES
        .iter()
        .find(|rule| rule.pattern.is_match(name))
        .map(|rule| rule.name)
}
