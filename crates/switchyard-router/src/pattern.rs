// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic pattern classification.
//!
//! Rules are grouped by module and tried in a fixed order; the first rule
//! that matches the lowercased message wins with that rule's confidence.
//! If no rule matches, single-keyword checks for the secondary modules run,
//! and after those the configured default module. The tier never declines.
//!
//! Secondary keywords belong to the built-in table: configured
//! `[[routing.rules]]` replace them along with the primary groups, and a
//! keyword only fires when its module is listed in `routing.modules`.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use switchyard_config::model::RoutingConfig;
use switchyard_core::{ClassificationRequest, ClassificationResult, Method, SwitchyardError};

use crate::tier::Tier;

/// Rationale reported when nothing matched.
pub const FALLBACK_RATIONALE: &str = "default fallback";

/// Subjects shared by the tutoring rules.
const SUBJECTS: &str = r"matem[aá]tica|f[ií]sica|qu[ií]mica|biologia|hist[oó]ria|geografia|portugu[eê]s|reda[cç][aã]o|ingl[eê]s|math|physics|chemistry|biology|history|geography";

/// Built-in rule groups, in match order. Portuguese and English phrasing.
const BUILTIN_GROUPS: &[(&str, &[(&str, f32)])] = &[
    (
        "it_support",
        &[
            (
                r"\b(senha|login|logar|entrar na (minha )?conta|password|sign in|log in)\b",
                0.92,
            ),
            (
                r"\b(erro|bug|travou|travando|crash|p[aá]gina n[aã]o carrega|site fora do ar|app n[aã]o abre|not loading|error message)\b",
                0.88,
            ),
        ],
    ),
    (
        "billing",
        &[(
            r"\b(pagamento|pagar|boleto|fatura|cobran[cç]a|reembolso|assinatura|cart[aã]o de cr[eé]dito|payment|invoice|refund|subscription|billing)\b",
            0.92,
        )],
    ),
    (
        "wellbeing",
        &[(
            r"\b(ansios[oa]|ansiedade|estressad[oa]|estresse|desmotivad[oa]|triste|burnout|anxious|anxiety|stressed|overwhelmed)\b",
            0.90,
        )],
    ),
    (
        "exam_prep",
        &[
            (r"\b(enem|vestibular|simulado|fuvest|concurso)\b", 0.95),
            (r"\b(prova|provas|exame|exams?|test prep|quiz)\b", 0.88),
        ],
    ),
    (
        "tutor",
        &[
            (
                // Help-seeking verb followed by a school subject.
                r"\b(d[uú]vida|explica|explicar|entender|me ajud[ae]|ajuda com|help me|explain|understand)\b.*\b(SUBJECTS)\b",
                0.93,
            ),
            (
                r"\b(SUBJECTS|equa[cç](?:[aã]o|[oõ]es)|equations?|fra[cç](?:[aã]o|[oõ]es)|derivada|integral)\b",
                0.87,
            ),
            (
                r"\b(como (resolvo|resolver|calcular|calculo|fa[cç]o)|how (do|can) i (solve|calculate))\b",
                0.85,
            ),
        ],
    ),
];

/// Secondary modules matched by single keywords when no rule fired.
const SECONDARY_KEYWORDS: &[(&str, &[&str], f32)] = &[
    (
        "lesson",
        &["aula", "aulas", "lição", "licao", "lesson", "lessons", "slide", "slides"],
        0.70,
    ),
    (
        "certificates",
        &["certificado", "certificados", "certificate", "certificates", "diploma"],
        0.70,
    ),
    (
        "images",
        &["imagem", "imagens", "image", "images", "foto", "fotos", "figura", "picture"],
        0.65,
    ),
];

static BUILTIN_KEYWORDS: LazyLock<Vec<KeywordRule>> = LazyLock::new(|| {
    SECONDARY_KEYWORDS
        .iter()
        .map(|(module, words, confidence)| KeywordRule {
            module: (*module).to_string(),
            words: words.iter().map(|w| (*w).to_string()).collect(),
            confidence: *confidence,
        })
        .collect()
});

static BUILTIN_RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    BUILTIN_GROUPS
        .iter()
        .flat_map(|(module, rules)| {
            rules.iter().map(move |(pattern, confidence)| {
                let pattern = pattern.replace("SUBJECTS", SUBJECTS);
                PatternRule {
                    module: (*module).to_string(),
                    pattern: Regex::new(&pattern).expect("built-in pattern must compile"),
                    confidence: *confidence,
                }
            })
        })
        .collect()
});

/// A compiled rule: a regex over the lowercased message and the module it selects.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub module: String,
    pub pattern: Regex,
    pub confidence: f32,
}

impl PatternRule {
    /// Compile a rule.
    pub fn new(
        module: impl Into<String>,
        pattern: &str,
        confidence: f32,
    ) -> Result<Self, SwitchyardError> {
        let module = module.into();
        let pattern = Regex::new(pattern).map_err(|e| {
            SwitchyardError::Config(format!("pattern rule for `{module}` does not compile: {e}"))
        })?;
        Ok(Self {
            module,
            pattern,
            confidence,
        })
    }
}

/// Whole-word keywords that select a secondary module.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRule {
    pub module: String,
    pub words: Vec<String>,
    pub confidence: f32,
}

/// Zero-cost classifier over an ordered rule table.
#[derive(Debug, Clone)]
pub struct PatternTier {
    rules: Vec<PatternRule>,
    keywords: Vec<KeywordRule>,
    default_module: String,
    default_confidence: f32,
}

impl PatternTier {
    /// The built-in rule table with `tutor` at 0.55 as default.
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES.clone(),
            keywords: BUILTIN_KEYWORDS.clone(),
            default_module: "tutor".to_string(),
            default_confidence: 0.55,
        }
    }

    /// Build from the `[routing]` section. An empty rule list means the built-in
    /// table, with secondary keywords limited to the configured modules.
    pub fn from_config(config: &RoutingConfig) -> Result<Self, SwitchyardError> {
        let (rules, keywords) = if config.rules.is_empty() {
            let keywords = BUILTIN_KEYWORDS
                .iter()
                .filter(|k| config.modules.iter().any(|m| m.eq_ignore_ascii_case(&k.module)))
                .cloned()
                .collect();
            (BUILTIN_RULES.clone(), keywords)
        } else {
            let rules = config
                .rules
                .iter()
                .map(|r| PatternRule::new(r.module.clone(), &r.pattern, r.confidence))
                .collect::<Result<Vec<_>, _>>()?;
            (rules, Vec::new())
        };
        Ok(Self {
            rules,
            keywords,
            default_module: config.default_module.clone(),
            default_confidence: config.default_confidence,
        })
    }

    /// Replace the rule table, keeping the default module.
    pub fn with_rules(mut self, rules: Vec<PatternRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the secondary keyword table.
    pub fn with_keywords(mut self, keywords: Vec<KeywordRule>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn keywords(&self) -> &[KeywordRule] {
        &self.keywords
    }

    pub fn default_module(&self) -> &str {
        &self.default_module
    }

    /// Classify a message. Pure: the same text always gives the same result.
    pub fn classify_text(&self, text: &str) -> ClassificationResult {
        let lowered = text.to_lowercase();

        for rule in &self.rules {
            if let Some(m) = rule.pattern.find(&lowered) {
                return ClassificationResult::new(
                    rule.module.clone(),
                    rule.confidence,
                    format!("{} rule matched \"{}\"", rule.module, m.as_str()),
                    Method::Pattern,
                );
            }
        }

        if let Some(result) = self.match_keyword(&lowered) {
            return result;
        }

        ClassificationResult::new(
            self.default_module.clone(),
            self.default_confidence,
            FALLBACK_RATIONALE,
            Method::Fallback,
        )
    }
}

impl PatternTier {
    fn match_keyword(&self, lowered: &str) -> Option<ClassificationResult> {
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        self.keywords.iter().find_map(|rule| {
            let hit = rule.words.iter().find(|k| words.contains(&k.as_str()))?;
            Some(ClassificationResult::new(
                rule.module.clone(),
                rule.confidence,
                format!("keyword \"{hit}\" suggests {}", rule.module),
                Method::Pattern,
            ))
        })
    }
}

impl Default for PatternTier {
    fn default() -> Self {
        Self::builtin()
    }
}


#[async_trait]
impl Tier for PatternTier {
    fn name(&self) -> &'static str {
        "pattern"
    }

    async fn classify(&self, request: &ClassificationRequest) -> Option<ClassificationResult> {
        Some(self.classify_text(&request.text))
    }
}
