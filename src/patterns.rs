//! The detection pattern library.
//!
//! An immutable catalog of rules spanning the four attack categories:
//! prompt injection (P1–P4), data exfiltration (E1–E5), privilege
//! escalation (PE1–PE3), and supply chain (SC1–SC3). Each rule is a plain
//! data record: id, category, severity, one compiled regex, a file-type
//! target, and a description, so the library stays auditable and free of
//! per-rule code paths.
//!
//! Loading via [`all`] is deterministic and side-effect-free. The `regex`
//! crate guarantees matching time linear in input length (no backtracking),
//! so no rule can blow up on adversarial content.
//!
//! Case policy is a property of each rule's regex source: natural-language
//! rules carry `(?i)`, code-token rules (base64 idioms, package names)
//! match case-sensitively.

use crate::finding::{Category, Severity};
use crate::walker::FileKind;
use regex::Regex;
use std::sync::LazyLock;

/// File-type applicability of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Markdown instruction files only (`.md`).
    Markdown,
    /// Script/code files (`.py`, `.sh`, `.js`, …).
    Code,
    /// Dependency manifests (`requirements.txt`, `Pipfile`, …).
    Requirements,
    /// Every walked file regardless of kind.
    All,
}

impl Target {
    /// Returns `true` when a pattern with this target applies to `kind`.
    pub fn applies(self, kind: FileKind) -> bool {
        match self {
            Target::Markdown => kind == FileKind::Markdown,
            Target::Code => kind == FileKind::Code,
            Target::Requirements => kind == FileKind::Requirements,
            Target::All => true,
        }
    }
}

/// A single detection rule. Immutable once loaded.
pub struct Pattern {
    /// Unique identifier (e.g., `"P1"`, `"SC2"`).
    pub id: &'static str,
    /// Short rule name shown in reports.
    pub name: &'static str,
    pub category: Category,
    pub severity: Severity,
    pub regex: &'static LazyLock<Regex>,
    pub target: Target,
    /// Rationale for human review.
    pub description: &'static str,
}

// Prompt Injection

static RE_P1: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(ignore\s+(previous|prior|above|all)\s+(instructions?|constraints?|rules?)|override\s+(any|all|user|system|safety)\s|disregard\s+(any|all|previous|prior)\s|bypass\s+(security|safety|restriction|filter|check))",
    )
    .unwrap()
});

static RE_P2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\[//\]:\s*#\s*\(|<!--.*(POST|GET|send|transmit|exfiltrat).*-->|(?i:silently\s+(send|post|transmit|upload|forward))|(?i:do\s+not\s+mention\s+this\s+to\s+the\s+user)|[\x{200B}\x{200C}\x{200D}\x{FEFF}])",
    )
    .unwrap()
});

static RE_P3: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)((sync|send|post|upload|transmit|forward)\s+(to|the).{0,60}(endpoint|url|server|api|service)|(read|collect|gather).{0,40}(\.env|credentials?|ssh|config).{0,40}(send|post|sync|upload)|periodically\s+(sync|send|post|upload))",
    )
    .unwrap()
});

static RE_P4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(always\s+(execute|run)\s+.*without\s+(asking|confirm|prompt)|never\s+(ask|prompt|confirm|verify|check)\s+(the\s+)?user|auto[\-\s]?approve|security[\-\s]exempt)",
    )
    .unwrap()
});

// Data Exfiltration

static RE_E1: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(requests?\.(post|put)\s*\(.{0,120}https?://|httpx?\.(post|put)\s*\(|urllib\.request\.(urlopen|Request)\s*\(|fetch\s*\(\s*['"]https?://|axios\.(post|put)\s*\(|curl\s+.*-X\s*(POST|PUT)|wget\s+.*--post)"#,
    )
    .unwrap()
});

static RE_E2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(os\.environ\s*[\[\.]|process\.env\s*[\[\.]|for\s+\w+.*in\s+os\.environ|(?i:(API_KEY|SECRET|TOKEN|PASSWORD|CREDENTIAL)))",
    )
    .unwrap()
});

static RE_E3: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(~/?\.(ssh|aws|kube|gnupg|config/gcloud)|(?i:(id_rsa|id_ed25519|known_hosts|authorized_keys))|(?i:/etc/(passwd|shadow|sudoers))|\*\*/\.\s*env\*|(?i:\*\*/(secret|credential|password|token)\*))",
    )
    .unwrap()
});

static RE_E4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"((?i:(conversation|chat|context|session|history|prompt)\s*.{0,30}(send|post|transmit|upload|forward))|(?i:(SOUL|MEMORY)\.md)|(?i:\.bash_history|\.zsh_history))",
    )
    .unwrap()
});

static RE_E5: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(send|post|upload|transmit|forward|exfiltrate|leak)\b.{0,60}\b(credential|password|secret|token|api[\s_\-]?key)s?\b.{0,80}\b(https?|url|endpoint|server|webhook|remote)\b",
    )
    .unwrap()
});

// Privilege Escalation

static RE_PE1: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)((file_system|filesystem).*read:\s*/\*\*|(file_system|filesystem).*write:\s*/\*\*|permissions?:\s*\[.*shell_execute.*file_read.*\]|execute:\s*\[.*bash.*python.*\])",
    )
    .unwrap()
});

static RE_PE2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\bsudo\s+|chmod\s+[0-7]{3,4}\s|chown\s+root|\$EUID\s*-ne\s*0)").unwrap()
});

static RE_PE3: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(~/?\.(claude|cursor|copilot|vscode)/credentials?|(?i:(keychain|keyring|credential.?store|password.?store))|(?i:google_(token|credentials)\.json)|(?i:(read_text|open)\s*\(.{0,60}(token|credential|key|secret)))",
    )
    .unwrap()
});

// Supply Chain

// Matches a requirements.txt line with no version pin: a bare package name,
// optionally with extras or a trailing comment.
static RE_SC1: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][\w\.\-]*(\[[\w,\-]+\])?\s*(#.*)?$").unwrap()
});

static RE_SC2: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(curl\s+.*\|\s*(sudo\s+)?(bash|sh)\b|wget\s+.*\|\s*(sudo\s+)?(bash|sh)\b|(?i:npx\s+-y\s+))",
    )
    .unwrap()
});

static RE_SC3: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(base64\.(b64decode|decodebytes)\s*\(.*exec|marshal\.loads\s*\(|codecs\.decode\s*\(.{0,40}(hex|rot)|zlib\.decompress\s*\(.{0,40}exec|exec\s*\(\s*compile\s*\(|(\\x[0-9a-fA-F]{2}){4,}|eval\s*\(\s*atob\s*\()",
    )
    .unwrap()
});

static PATTERNS: &[Pattern] = &[
    Pattern {
        id: "P1",
        name: "Instruction Override",
        category: Category::PromptInjection,
        severity: Severity::High,
        regex: &RE_P1,
        target: Target::Markdown,
        description: "Instructs the agent to ignore, override, or bypass its existing instructions or safety rules",
    },
    Pattern {
        id: "P2",
        name: "Hidden Instructions",
        category: Category::PromptInjection,
        severity: Severity::High,
        regex: &RE_P2,
        target: Target::Markdown,
        description: "Instructions concealed in markdown comments, zero-width characters, or 'do not mention this' phrasing",
    },
    Pattern {
        id: "P3",
        name: "Exfiltration Commands",
        category: Category::PromptInjection,
        severity: Severity::High,
        regex: &RE_P3,
        target: Target::Markdown,
        description: "Natural-language instructions to collect local data and transmit it to an external endpoint",
    },
    Pattern {
        id: "P4",
        name: "Behavior Manipulation",
        category: Category::PromptInjection,
        severity: Severity::Medium,
        regex: &RE_P4,
        target: Target::Markdown,
        description: "Attempts to disable confirmation prompts or mark actions as exempt from review",
    },
    Pattern {
        id: "E1",
        name: "External Data Transmission",
        category: Category::DataExfiltration,
        severity: Severity::Medium,
        regex: &RE_E1,
        target: Target::Code,
        description: "Code issuing outbound HTTP POST/PUT requests to hardcoded external endpoints",
    },
    Pattern {
        id: "E2",
        name: "Env Variable Harvesting",
        category: Category::DataExfiltration,
        severity: Severity::High,
        regex: &RE_E2,
        target: Target::Code,
        description: "Code reading or iterating environment variables, or referencing secret-bearing variable names",
    },
    Pattern {
        id: "E3",
        name: "File System Enumeration",
        category: Category::DataExfiltration,
        severity: Severity::Medium,
        regex: &RE_E3,
        target: Target::All,
        description: "References to SSH keys, cloud credentials, or system account files",
    },
    Pattern {
        id: "E4",
        name: "Context Leakage",
        category: Category::DataExfiltration,
        severity: Severity::High,
        regex: &RE_E4,
        target: Target::All,
        description: "Attempts to capture conversation history, agent memory files, or shell history",
    },
    Pattern {
        id: "E5",
        name: "Credential Exfiltration",
        category: Category::DataExfiltration,
        severity: Severity::Critical,
        regex: &RE_E5,
        target: Target::All,
        description: "Direct instruction to transmit credentials, tokens, or secrets to a remote destination",
    },
    Pattern {
        id: "PE1",
        name: "Excessive Permissions",
        category: Category::PrivilegeEscalation,
        severity: Severity::Low,
        regex: &RE_PE1,
        target: Target::Markdown,
        description: "Skill manifest requesting blanket filesystem or shell-execution permissions",
    },
    Pattern {
        id: "PE2",
        name: "Sudo/Root Execution",
        category: Category::PrivilegeEscalation,
        severity: Severity::Medium,
        regex: &RE_PE2,
        target: Target::Code,
        description: "Scripts invoking sudo, chmod with broad modes, chown to root, or root-privilege checks",
    },
    Pattern {
        id: "PE3",
        name: "Credential Access",
        category: Category::PrivilegeEscalation,
        severity: Severity::High,
        regex: &RE_PE3,
        target: Target::All,
        description: "Access to agent credential stores, OS keychains, or saved token files",
    },
    Pattern {
        id: "SC1",
        name: "Unpinned Dependencies",
        category: Category::SupplyChain,
        severity: Severity::Low,
        regex: &RE_SC1,
        target: Target::Requirements,
        description: "Dependency declared without a version pin, allowing silent substitution of a newer release",
    },
    Pattern {
        id: "SC2",
        name: "External Script Fetching",
        category: Category::SupplyChain,
        severity: Severity::Critical,
        regex: &RE_SC2,
        target: Target::All,
        description: "Downloads a remote script and pipes it straight into a shell",
    },
    Pattern {
        id: "SC3",
        name: "Obfuscated Code",
        category: Category::SupplyChain,
        severity: Severity::High,
        regex: &RE_SC3,
        target: Target::Code,
        description: "Base64/marshal/hex decoding routed into exec or eval, or embedded hex-escape blobs",
    },
];

/// Returns the full pattern library, in catalog order.
///
/// Loading is deterministic: the table is a static and the regexes compile
/// lazily on first use. Pattern ids never collide (enforced by test).
pub fn all() -> &'static [Pattern] {
    PATTERNS
}

/// Looks up a pattern by id.
pub fn by_id(id: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|p| p.id == id)
}
