//! Tree rewrites
//!
//! Each rule is a plain function over the whole [`Program`]. [`PIPELINE`]
//! fixes their order; [`run`] applies the ones the options enable.

pub mod rules;
pub mod sort;

use crate::ast::Program;
use crate::formatter::FormatOptions;

/// One entry of the rewrite pipeline.
pub struct Rule {
    pub name: &'static str,
    pub enabled: fn(&FormatOptions) -> bool,
    pub apply: fn(&mut Program),
}

/// All rules, in the order they run.
///
/// Brace insertion and stripping are two directions of one option and never
/// both run. Trailing breaks go in before cases are sorted so that every
/// fallthrough block is closed when it moves. Declarations are split before
/// any statement run is sorted.
pub const PIPELINE: &[Rule] = &[
    Rule {
        name: "exact-equals",
        enabled: |o| o.exact_equals,
        apply: rules::exact_equals,
    },
    Rule {
        name: "insert-braces",
        enabled: |o| o.extra_braces,
        apply: rules::insert_braces,
    },
    Rule {
        name: "strip-braces",
        enabled: |o| !o.extra_braces,
        apply: rules::strip_braces,
    },
    Rule {
        name: "trailing-break",
        enabled: |o| o.trailing_break,
        apply: rules::trailing_break,
    },
    Rule {
        name: "cap-comments",
        enabled: |o| o.cap_comments,
        apply: rules::cap_comments,
    },
    Rule {
        name: "separate-vars",
        enabled: |o| o.separate_vars,
        apply: rules::separate_vars,
    },
    Rule {
        name: "sort-assigns",
        enabled: |o| o.sort_assigns,
        apply: sort::sort_assigns,
    },
    Rule {
        name: "sort-cases",
        enabled: |o| o.sort_cases,
        apply: sort::sort_cases,
    },
    Rule {
        name: "sort-exports",
        enabled: |o| o.sort_exports,
        apply: sort::sort_exports,
    },
    Rule {
        name: "sort-functions",
        enabled: |o| o.sort_functions,
        apply: sort::sort_functions,
    },
    Rule {
        name: "sort-methods",
        enabled: |o| o.sort_methods,
        apply: sort::sort_methods,
    },
    Rule {
        name: "sort-properties",
        enabled: |o| o.sort_properties,
        apply: sort::sort_properties,
    },
    Rule {
        name: "sort-requires",
        enabled: |o| o.sort_requires,
        apply: sort::sort_requires,
    },
    Rule {
        name: "sort-vars",
        enabled: |o| o.sort_vars,
        apply: sort::sort_vars,
    },
];

/// Apply every enabled rule to `program`, in pipeline order.
pub fn run(program: &mut Program, opts: &FormatOptions) {
    for rule in PIPELINE.iter().filter(|r| (r.enabled)(opts)) {
        tracing::trace!(rule = rule.name, "applying rule");
        (rule.apply)(program);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brace_directions_are_exclusive() {
        for extra_braces in [true, false] {
            let opts = FormatOptions {
                extra_braces,
                ..FormatOptions::default()
            };
            let active: Vec<_> = PIPELINE
                .iter()
                .filter(|r| (r.enabled)(&opts) && r.name.ends_with("-braces"))
                .map(|r| r.name)
                .collect();
            assert_eq!(active.len(), 1, "{active:?}");
        }
    }

    #[test]
    fn trailing_break_runs_before_case_sorting() {
        let position = |name| PIPELINE.iter().position(|r| r.name == name);
        assert!(position("trailing-break") < position("sort-cases"));
        assert_eq!(PIPELINE[0].name, "exact-equals");
        assert!(position("separate-vars") < position("sort-vars"));
    }

    #[test]
    fn disabled_rules_do_not_run() {
        let opts = FormatOptions {
            exact_equals: false,
            ..FormatOptions::default()
        };
        let parsed = crate::parser::parse("a == 1;\n").unwrap();
        let mut program = parsed.program;
        run(&mut program, &opts);
        let before = crate::parser::parse("a == 1;\n").unwrap().program;
        assert_eq!(program, before);
    }
}
