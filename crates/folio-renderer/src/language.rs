//! Code block languages and best-guess detection.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// A language the HTML output can annotate for syntax highlighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Language {
    Bash,
    C,
    Cpp,
    CSharp,
    Css,
    Diff,
    Dockerfile,
    Go,
    Html,
    Java,
    JavaScript,
    Json,
    Jsx,
    Kotlin,
    Markdown,
    Php,
    Python,
    Ruby,
    Rust,
    Sql,
    Swift,
    Toml,
    Tsx,
    TypeScript,
    Xml,
    Yaml,
}

impl Language {
    /// Resolve a fence name or alias (`js`, `py`, `sh`, ...), case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let lang = match name.to_ascii_lowercase().as_str() {
            "bash" | "sh" | "shell" | "zsh" | "console" | "shellscript" => Self::Bash,
            "c" | "h" => Self::C,
            "cpp" | "c++" | "cc" | "cxx" | "hpp" => Self::Cpp,
            "csharp" | "cs" | "c#" => Self::CSharp,
            "css" => Self::Css,
            "diff" | "patch" => Self::Diff,
            "dockerfile" | "docker" => Self::Dockerfile,
            "go" | "golang" => Self::Go,
            "html" | "htm" | "xhtml" => Self::Html,
            "java" => Self::Java,
            "javascript" | "js" | "mjs" | "cjs" | "node" => Self::JavaScript,
            "json" | "jsonc" | "json5" => Self::Json,
            "jsx" => Self::Jsx,
            "kotlin" | "kt" | "kts" => Self::Kotlin,
            "markdown" | "md" | "mdx" => Self::Markdown,
            "php" => Self::Php,
            "python" | "py" | "python3" => Self::Python,
            "ruby" | "rb" => Self::Ruby,
            "rust" | "rs" => Self::Rust,
            "sql" | "postgres" | "postgresql" | "mysql" | "sqlite" => Self::Sql,
            "swift" => Self::Swift,
            "toml" => Self::Toml,
            "tsx" => Self::Tsx,
            "typescript" | "ts" | "mts" | "cts" => Self::TypeScript,
            "xml" | "svg" => Self::Xml,
            "yaml" | "yml" => Self::Yaml,
            _ => return None,
        };
        Some(lang)
    }

    /// Canonical name, used in `language-*` CSS classes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::CSharp => "csharp",
            Self::Css => "css",
            Self::Diff => "diff",
            Self::Dockerfile => "dockerfile",
            Self::Go => "go",
            Self::Html => "html",
            Self::Java => "java",
            Self::JavaScript => "javascript",
            Self::Json => "json",
            Self::Jsx => "jsx",
            Self::Kotlin => "kotlin",
            Self::Markdown => "markdown",
            Self::Php => "php",
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::Rust => "rust",
            Self::Sql => "sql",
            Self::Swift => "swift",
            Self::Toml => "toml",
            Self::Tsx => "tsx",
            Self::TypeScript => "typescript",
            Self::Xml => "xml",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum score for a heuristic guess to be accepted.
const MIN_SCORE: u32 = 2;

/// Detection rules: language, weight, pattern (multi-line mode).
const RULES: &[(Language, u32, &str)] = &[
    (Language::Rust, 2, r"\bfn\s+\w+\s*[<(]"),
    (Language::Rust, 1, r"\blet\s+mut\b"),
    (Language::Rust, 2, r"\b(println|vec|format)!"),
    (Language::Rust, 1, r"\bimpl\b.*\{"),
    (Language::Rust, 1, r"\bpub\s+(fn|struct|enum|mod|trait)\b"),
    (Language::Rust, 1, r"^use\s+\w+(::\w+)+"),
    (Language::Python, 2, r"^\s*def\s+\w+\s*\(.*\)\s*(->\s*[\w\[\], ]+)?:\s*$"),
    (Language::Python, 1, r"^\s*from\s+[\w.]+\s+import\s+\w+"),
    (Language::Python, 1, r"\bself\.\w+"),
    (Language::Python, 1, r"^\s*(elif|except)\b.*:\s*$"),
    (Language::Python, 1, r"\bprint\("),
    (Language::Python, 2, r"__name__\s*==\s*.__main__."),
    (Language::TypeScript, 2, r"^\s*(export\s+)?interface\s+\w+"),
    (Language::TypeScript, 2, r":\s*(string|number|boolean|void|any|unknown)\b"),
    (Language::TypeScript, 2, r"^\s*(export\s+)?type\s+\w+\s*="),
    (Language::JavaScript, 1, r"\b(const|let|var)\s+\w+\s*="),
    (Language::JavaScript, 1, r"=>"),
    (Language::JavaScript, 1, r"\bfunction\s*\w*\s*\("),
    (Language::JavaScript, 2, r"\bconsole\.(log|error|warn)\("),
    (Language::JavaScript, 1, r"\brequire\(['\x22]"),
    (Language::JavaScript, 1, r"^\s*import\s+.*\s+from\s+['\x22]"),
    (Language::Go, 2, r"^package\s+\w+\s*$"),
    (Language::Go, 2, r"\bfunc\s+(\(\w+\s+\*?\w+\)\s*)?\w+\("),
    (Language::Go, 1, r":="),
    (Language::Go, 2, r"\bfmt\.\w+\("),
    (Language::Java, 2, r"\bpublic\s+(static\s+)?(final\s+)?(class|void|interface)\b"),
    (Language::Java, 2, r"\bSystem\.out\.print"),
    (Language::Java, 1, r"@Override\b"),
    (Language::CSharp, 2, r"^\s*using\s+System"),
    (Language::CSharp, 2, r"\bConsole\.Write(Line)?\("),
    (Language::CSharp, 1, r"^\s*namespace\s+[\w.]+"),
    (Language::Cpp, 2, r"\bstd::\w+"),
    (Language::Cpp, 2, r"#include\s*<(iostream|vector|string|memory|map)>"),
    (Language::Cpp, 1, r"\bcout\s*<<"),
    (Language::C, 2, r"#include\s*<\w+\.h>"),
    (Language::C, 1, r"\bint\s+main\s*\("),
    (Language::C, 1, r"\bprintf\("),
    (Language::Php, 3, r"<\?php"),
    (Language::Ruby, 2, r"^\s*def\s+\w+[^:]*$"),
    (Language::Ruby, 1, r"^\s*end\s*$"),
    (Language::Ruby, 1, r"\bputs\s"),
    (Language::Ruby, 1, r"\.each\s+do\b"),
    (Language::Sql, 2, r"(?i)\bselect\b.+\bfrom\b"),
    (Language::Sql, 2, r"(?i)\binsert\s+into\b"),
    (Language::Sql, 2, r"(?i)\bcreate\s+(table|index|view)\b"),
    (Language::Sql, 1, r"(?i)\bwhere\b"),
    (Language::Bash, 2, r"^#!.*\b(ba|z)?sh\b"),
    (Language::Bash, 1, r"^\s*\$\s+\w+"),
    (
        Language::Bash,
        1,
        r"^\s*(\$\s+)?(sudo|apt|apt-get|brew|npm|npx|yarn|pnpm|cargo|pip|git|cd|ls|mkdir|echo|curl|docker|kubectl)\s",
    ),
    (Language::Bash, 1, r"^\s*(fi|done|esac)\s*$"),
    (Language::Dockerfile, 2, r"^FROM\s+\S+"),
    (Language::Dockerfile, 1, r"^(RUN|COPY|WORKDIR|ENTRYPOINT|CMD|EXPOSE|ENV)\s"),
    (Language::Diff, 2, r"^(\+\+\+|---)\s+[ab]/"),
    (Language::Diff, 2, r"^@@\s.*\s@@"),
    (Language::Css, 1, r"^\s*[.#]?[\w-]+(\s*[,>+~]?\s*[.#:]?[\w-]+)*\s*\{\s*$"),
    (Language::Css, 1, r"^\s*[\w-]+\s*:\s*[^;{}]+;\s*$"),
    (Language::Css, 2, r"@media\b"),
    (Language::Html, 2, r"<(div|span|p|ul|li|body|head|section|article|button)\b[^>]*>"),
    (Language::Html, 1, r"</\w+>"),
    (Language::Toml, 2, r"^\[[\w.-]+\]\s*$"),
    (Language::Toml, 1, r#"^[\w-]+\s*=\s*("|\d|\[|true\b|false\b)"#),
    (Language::Yaml, 1, r"^[\w-]+:(\s+[^{};=]*)?$"),
    (Language::Yaml, 1, r"^\s*-\s+[\w-]+:\s"),
];

static COMPILED_RULES: LazyLock<Vec<(Language, u32, Regex)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|(lang, weight, pattern)| (*lang, *weight, Regex::new(&format!("(?m){pattern}")).unwrap()))
        .collect()
});

/// Guess the language of an undeclared code block.
///
/// Strong markers are checked first (a parseable JSON document, a shebang,
/// an XML or HTML prologue). Otherwise every rule that matches adds its
/// weight to its language; the highest score wins if it reaches the
/// threshold. Ties go to the language listed first.
pub fn detect(source: &str) -> Option<Language> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return None;
    }

    if (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
    {
        return Some(Language::Json);
    }
    if let Some(first_line) = trimmed.lines().next()
        && first_line.starts_with("#!")
    {
        if first_line.contains("python") {
            return Some(Language::Python);
        }
        if first_line.contains("node") {
            return Some(Language::JavaScript);
        }
    }
    let lower_start: String = trimmed.chars().take(15).collect::<String>().to_lowercase();
    if lower_start.starts_with("<?xml") {
        return Some(Language::Xml);
    }
    if lower_start.starts_with("<!doctype html") || lower_start.starts_with("<html") {
        return Some(Language::Html);
    }

    let mut scores: Vec<(Language, u32)> = Vec::new();
    for (lang, weight, regex) in COMPILED_RULES.iter() {
        if regex.is_match(source) {
            match scores.iter_mut().find(|(l, _)| l == lang) {
                Some((_, score)) => *score += weight,
                None => scores.push((*lang, *weight)),
            }
        }
    }

    let mut best: Option<(Language, u32)> = None;
    for (lang, score) in scores {
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((lang, score));
        }
    }
    best.filter(|(_, score)| *score >= MIN_SCORE)
        .map(|(lang, _)| lang)
}
