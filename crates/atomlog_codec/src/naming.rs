//! Name conversions between Rust identifiers and XML element names.

/// How Rust names map to element names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming {
    /// Kebab-case element names (`UserCreated` becomes `user-created`).
    Convention,
    /// Element names are used exactly as declared.
    Verbatim,
}

impl Naming {
    /// Returns the element name for a Rust type, field or variant name.
    #[must_use]
    pub fn element_name(self, name: &str) -> String {
        match self {
            Self::Convention => to_kebab_case(name),
            Self::Verbatim => strip_raw(name).to_string(),
        }
    }

    /// Returns `true` if `element` names the Rust item `name`.
    ///
    /// Matching is case-insensitive and accepts both the converted and the
    /// declared form.
    #[must_use]
    pub fn matches(self, name: &str, element: &str) -> bool {
        self.element_name(name).eq_ignore_ascii_case(element)
            || strip_raw(name).eq_ignore_ascii_case(element)
    }
}

fn strip_raw(name: &str) -> &str {
    name.strip_prefix("r#").unwrap_or(name)
}

/// Converts an identifier to kebab-case.
///
/// Word boundaries are underscores, hyphens, lower-to-upper transitions and
/// the last capital of an acronym followed by lowercase (`XMLParser` becomes
/// `xml-parser`).
#[must_use]
pub fn to_kebab_case(name: &str) -> String {
    let chars: Vec<char> = strip_raw(name).chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
                _ => false,
            };
            if boundary && !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Converts a kebab-case or snake_case name to PascalCase.
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// A parsed Rust type path such as `my_app::events::Envelope<my_app::Order>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePath {
    /// Module segments leading to the type.
    pub module: Vec<String>,
    /// The type's own name.
    pub name: String,
    /// Generic arguments, in order.
    pub arguments: Vec<TypePath>,
}

impl TypePath {
    /// Parses the output of [`std::any::type_name`].
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        let (base, arguments) = match (path.find('<'), path.rfind('>')) {
            (Some(open), Some(close)) if open < close => (
                &path[..open],
                split_arguments(&path[open + 1..close])
                    .into_iter()
                    .map(Self::parse)
                    .collect(),
            ),
            _ => (path, Vec::new()),
        };

        let mut segments: Vec<String> = base
            .split("::")
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        let name = segments.pop().unwrap_or_default();
        Self {
            module: segments,
            name,
            arguments,
        }
    }

    /// Element name derived from the type name.
    #[must_use]
    pub fn element_name(&self) -> String {
        to_kebab_case(&self.name)
    }

    /// Namespace URN derived from the module path, e.g. `urn:my-app:events`.
    #[must_use]
    pub fn namespace_urn(&self) -> String {
        let segments: Vec<String> = self.module.iter().map(|s| to_kebab_case(s)).collect();
        format!("urn:{}", segments.join(":"))
    }

    /// The single generic argument, if the type has exactly one.
    #[must_use]
    pub fn generic_argument(&self) -> Option<&TypePath> {
        match self.arguments.as_slice() {
            [argument] => Some(argument),
            _ => None,
        }
    }
}

fn split_arguments(arguments: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in arguments.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(arguments[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = arguments[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}
