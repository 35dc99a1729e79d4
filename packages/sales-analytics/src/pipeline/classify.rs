//! Keyword classifier for the fallback path.
//!
//! Questions are matched against [`RULES`] in order; the first rule whose
//! predicate holds decides the [`Intent`]. Matching is plain substring or
//! whole-word lookup on the lowercased text.

/// Month words and their calendar number. Both spellings of March are
/// accepted since users often type without the cedilla.
const MONTH_WORDS: &[(&str, u32)] = &[
    ("janeiro", 1),
    ("fevereiro", 2),
    ("março", 3),
    ("marco", 3),
    ("abril", 4),
    ("maio", 5),
    ("junho", 6),
    ("julho", 7),
    ("agosto", 8),
    ("setembro", 9),
    ("outubro", 10),
    ("novembro", 11),
    ("dezembro", 12),
];

const COMPARISON_KEYWORDS: &[&str] = &["compar", "versus", "diferença", "diferenca"];
const DIVERSITY_KEYWORDS: &[&str] = &[
    "quantos produtos",
    "quais produtos",
    "produtos diferentes",
    "diversidade",
    "variedade",
    "tipos de produto",
    "quantidade de produtos",
];
const RANKING_KEYWORDS: &[&str] = &["ranking", "lista", "listar", "principais"];
const REGION_KEYWORDS: &[&str] = &["região", "regiao", "regiões", "regioes", "regional"];
const CATEGORY_KEYWORDS: &[&str] = &["categoria", "segmento"];
const MONTH_KEYWORDS: &[&str] = &["mês", "mes", "meses", "mensal"];
const TOTAL_KEYWORDS: &[&str] = &["total", "receita", "faturamento", "quanto"];

pub const DEFAULT_TOP_N: usize = 5;
pub const MAX_TOP_N: usize = 20;

/// A question prepared for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text: String,
    lower: String,
    words: Vec<String>,
    /// Months in order of first mention, without duplicates.
    pub months: Vec<u32>,
}

impl Question {
    pub fn parse(text: &str) -> Self {
        let lower = text.trim().to_lowercase();
        let words: Vec<String> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        let months = detect_months(&words);

        Self {
            text: text.trim().to_string(),
            lower,
            words,
            months,
        }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lower.contains(needle)
    }

    pub fn contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.contains(n))
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn has_any_word(&self, words: &[&str]) -> bool {
        words.iter().any(|w| self.has_word(w))
    }

    /// The month when exactly one is mentioned.
    pub fn single_month(&self) -> Option<u32> {
        match self.months.as_slice() {
            [month] => Some(*month),
            _ => None,
        }
    }

    /// N from "top N", clamped to 1..=20; 5 when absent.
    pub fn top_n(&self) -> usize {
        self.words
            .windows(2)
            .find(|pair| pair[0] == "top")
            .and_then(|pair| pair[1].parse::<usize>().ok())
            .map(|n| n.clamp(1, MAX_TOP_N))
            .unwrap_or(DEFAULT_TOP_N)
    }

    fn wants_comparison(&self) -> bool {
        self.contains_any(COMPARISON_KEYWORDS) || self.has_word("vs")
    }
}

/// Month words are matched whole, so "maior" never reads as "maio".
fn detect_months(words: &[String]) -> Vec<u32> {
    let mut months = Vec::new();
    for word in words {
        let found = MONTH_WORDS
            .iter()
            .find(|(name, _)| name == word)
            .map(|(_, number)| *number);
        if let Some(month) = found {
            if !months.contains(&month) {
                months.push(month);
            }
        }
    }
    months
}

/// What the fallback renderer should answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    CompareTwoMonths { first: u32, second: u32 },
    /// All months ranked, mentioned ones highlighted.
    MonthRanking { highlight: Vec<u32> },
    ProductDiversity,
    TopProducts { n: usize },
    Region { month: Option<u32> },
    ProductSales { month: Option<u32> },
    Category,
    BestMonth,
    TotalRevenue,
    MonthOverview { month: u32 },
    Help,
}

/// One classifier rule.
pub struct Rule {
    pub name: &'static str,
    pub applies: fn(&Question) -> bool,
    pub intent: fn(&Question) -> Intent,
}

/// Classifier rules, highest precedence first.
pub const RULES: &[Rule] = &[
    Rule {
        name: "comparison",
        applies: |q| q.months.len() >= 2 || (q.months.len() == 1 && q.wants_comparison()),
        intent: |q| match q.months.as_slice() {
            [first, second] => Intent::CompareTwoMonths {
                first: *first,
                second: *second,
            },
            months => Intent::MonthRanking {
                highlight: months.to_vec(),
            },
        },
    },
    Rule {
        name: "diversity",
        applies: |q| q.contains_any(DIVERSITY_KEYWORDS),
        intent: |_| Intent::ProductDiversity,
    },
    Rule {
        name: "top_n",
        applies: |q| q.has_word("top") || q.contains_any(RANKING_KEYWORDS),
        intent: |q| Intent::TopProducts { n: q.top_n() },
    },
    Rule {
        name: "region",
        applies: |q| q.contains_any(REGION_KEYWORDS),
        intent: |q| Intent::Region {
            month: q.single_month(),
        },
    },
    Rule {
        name: "product_sales",
        applies: |q| match q.single_month() {
            Some(_) => q.contains("produto") || q.contains("vendido"),
            None => q.months.is_empty() && (q.contains("produto") || q.contains("vendido")),
        },
        intent: |q| Intent::ProductSales {
            month: q.single_month(),
        },
    },
    Rule {
        name: "category",
        applies: |q| q.contains_any(CATEGORY_KEYWORDS),
        intent: |_| Intent::Category,
    },
    Rule {
        name: "best_month",
        applies: |q| q.months.is_empty() && q.has_any_word(MONTH_KEYWORDS),
        intent: |_| Intent::BestMonth,
    },
    Rule {
        name: "total",
        applies: |q| q.contains_any(TOTAL_KEYWORDS),
        intent: |q| match q.single_month() {
            Some(month) => Intent::MonthOverview { month },
            None => Intent::TotalRevenue,
        },
    },
    Rule {
        name: "month_overview",
        applies: |q| q.single_month().is_some(),
        intent: |q| match q.single_month() {
            Some(month) => Intent::MonthOverview { month },
            None => Intent::Help,
        },
    },
];

/// The first matching rule's name and intent; `("help", Intent::Help)` when
/// nothing matches.
pub fn classify_with_rule(question: &Question) -> (&'static str, Intent) {
    RULES
        .iter()
        .find(|rule| (rule.applies)(question))
        .map(|rule| (rule.name, (rule.intent)(question)))
        .unwrap_or(("help", Intent::Help))
}

pub fn classify(question: &Question) -> Intent {
    classify_with_rule(question).1
}
