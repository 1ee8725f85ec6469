use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use jsclean::comments;
use jsclean::debug;
use jsclean::formatter::{FormatOptions, format_source};
use jsclean::parser;
use rayon::prelude::*;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

const EXTENSIONS: &[&str] = &["js", "mjs", "cjs"];

#[derive(Parser, Debug)]
#[command(name = "jsclean", version, about = "Opinionated JavaScript reformatter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Format files, or stdin when no paths are given
    Fmt {
        /// Files or directories to format
        paths: Vec<PathBuf>,
        /// Write the formatted content back to the files
        #[arg(long, conflicts_with = "check")]
        write: bool,
        /// Check if files are formatted; non-zero exit if changes needed
        #[arg(long)]
        check: bool,
        /// Do not keep a `.bak` copy of rewritten files
        #[arg(long)]
        no_backup: bool,
        /// Indent with this many spaces instead of a tab
        #[arg(long, value_name = "N")]
        spaces: Option<usize>,
        #[command(flatten)]
        rules: RuleFlags,
    },
    /// Dump the syntax tree of a file
    Debug {
        /// File to debug
        file: PathBuf,
        /// Show the raw tree-sitter tree instead of the comment outline
        #[arg(long)]
        cst: bool,
    },
}

/// Switches for the individual rewrite rules, all on by default.
#[derive(Args, Debug)]
struct RuleFlags {
    /// Keep `==` and `!=` as written
    #[arg(long)]
    no_exact_equals: bool,
    /// Remove braces from single-statement bodies instead of adding them
    #[arg(long)]
    no_extra_braces: bool,
    /// Leave line comment capitalization alone
    #[arg(long)]
    no_cap_comments: bool,
    /// Keep multi-binding declarations together
    #[arg(long)]
    no_separate_vars: bool,
    /// Keep switch cases in source order
    #[arg(long)]
    no_sort_cases: bool,
    /// Keep function declarations in source order
    #[arg(long)]
    no_sort_functions: bool,
    /// Keep object properties in source order
    #[arg(long)]
    no_sort_properties: bool,
    /// Keep class methods in source order
    #[arg(long)]
    no_sort_methods: bool,
    /// Keep constant declarations in source order
    #[arg(long)]
    no_sort_vars: bool,
    /// Keep simple assignments in source order
    #[arg(long)]
    no_sort_assigns: bool,
    /// Keep `require` declarations in source order
    #[arg(long)]
    no_sort_requires: bool,
    /// Keep `exports.x = x` statements in source order
    #[arg(long)]
    no_sort_exports: bool,
    /// Do not add `break` to the last switch case
    #[arg(long)]
    no_trailing_break: bool,
    /// Omit statement-ending semicolons
    #[arg(long)]
    no_semicolons: bool,
}

impl RuleFlags {
    fn options(&self, spaces: Option<usize>) -> FormatOptions {
        FormatOptions {
            indent: spaces.map_or_else(|| "\t".to_string(), |n| " ".repeat(n)),
            exact_equals: !self.no_exact_equals,
            extra_braces: !self.no_extra_braces,
            cap_comments: !self.no_cap_comments,
            separate_vars: !self.no_separate_vars,
            sort_cases: !self.no_sort_cases,
            sort_functions: !self.no_sort_functions,
            sort_properties: !self.no_sort_properties,
            sort_methods: !self.no_sort_methods,
            sort_vars: !self.no_sort_vars,
            sort_assigns: !self.no_sort_assigns,
            sort_requires: !self.no_sort_requires,
            sort_exports: !self.no_sort_exports,
            trailing_break: !self.no_trailing_break,
            semicolons: !self.no_semicolons,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Print formatted output
    Stdout,
    /// Rewrite changed files in place
    Write,
    /// Only report files that would change
    Check,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fmt {
            paths,
            write,
            check,
            no_backup,
            spaces,
            rules,
        } => {
            let mode = if write {
                Mode::Write
            } else if check {
                Mode::Check
            } else {
                Mode::Stdout
            };
            let opts = rules.options(spaces);
            let ok = if paths.is_empty() {
                format_stdin(&opts, mode)?
            } else {
                format_paths(&paths, &opts, mode, !no_backup)
            };
            if !ok {
                std::process::exit(1);
            }
        }
        Commands::Debug { file, cst } => {
            debug_file(&file, cst)?;
        }
    }
    Ok(())
}

fn format_stdin(opts: &FormatOptions, mode: Mode) -> Result<bool> {
    if mode == Mode::Write {
        bail!("--write needs at least one path");
    }
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    let formatted = format_source(&input, opts).context("<stdin>")?;
    match mode {
        Mode::Check => Ok(formatted == input),
        _ => {
            io::stdout().write_all(formatted.as_bytes())?;
            Ok(true)
        }
    }
}

/// Format every file under `paths`. False when any file failed, or in check
/// mode when any file would change.
fn format_paths(paths: &[PathBuf], opts: &FormatOptions, mode: Mode, backup: bool) -> bool {
    let mut ok = true;
    let mut files = Vec::new();
    for p in paths {
        if let Err(e) = collect_js_files(p, &mut files) {
            eprintln!("error: {e:#}");
            ok = false;
        }
    }
    tracing::debug!(count = files.len(), "collected files");

    let results: Vec<_> = files
        .par_iter()
        .map(|path| format_file(path, opts))
        .collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (path, result) in files.iter().zip(results) {
        let outcome = result.and_then(|(input, formatted)| {
            let changed = formatted != input;
            match mode {
                Mode::Stdout => {
                    if files.len() > 1 {
                        writeln!(out, "===== {} =====", path.display())?;
                    }
                    out.write_all(formatted.as_bytes())?;
                }
                Mode::Write if changed => {
                    if backup {
                        fs::copy(path, backup_path(path)).with_context(|| {
                            format!("{}: failed to write backup", path.display())
                        })?;
                    }
                    write_atomically(path, &formatted)?;
                    writeln!(out, "{}", path.display())?;
                }
                Mode::Check if changed => {
                    writeln!(out, "{}", path.display())?;
                    ok = false;
                }
                _ => {}
            }
            Ok(())
        });
        if let Err(e) = outcome {
            eprintln!("error: {e:#}");
            ok = false;
        }
    }
    ok
}

fn format_file(path: &Path, opts: &FormatOptions) -> Result<(String, String)> {
    let input = fs::read_to_string(path)
        .with_context(|| format!("{}: failed to read", path.display()))?;
    let formatted =
        format_source(&input, opts).with_context(|| path.display().to_string())?;
    Ok((input, formatted))
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

/// Replace `path` through a temporary file in the same directory so a crash
/// never leaves a half-written source file.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("{}: failed to create temporary file", path.display()))?;
    tmp.write_all(contents.as_bytes())?;
    let permissions = fs::metadata(path)?.permissions();
    fs::set_permissions(tmp.path(), permissions)?;
    tmp.persist(path)
        .with_context(|| format!("{}: failed to replace file", path.display()))?;
    Ok(())
}

fn debug_file(path: &Path, cst: bool) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("{}: failed to read", path.display()))?;
    println!("===== {} =====", path.display());
    if cst {
        print!("{}", debug::syntax_tree(&content)?);
        return Ok(());
    }
    let parsed = parser::parse(&content)?;
    let mut program = parsed.program;
    comments::attach(&mut program, parsed.comments)?;
    print!("{}", debug::outline(&mut program));
    Ok(())
}

/// Add `path` if it is a file, or every JavaScript file below it if it is a
/// directory. A missing path is an error.
fn collect_js_files(path: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    if !path.exists() {
        bail!("{}: no such file or directory", path.display());
    }
    if path.is_file() {
        out.push(path.to_path_buf());
        return Ok(());
    }
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.with_context(|| format!("{}: failed to walk directory", path.display()))?;
        let p = entry.path();
        let is_js = p
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| EXTENSIONS.contains(&ext));
        if p.is_file() && is_js {
            out.push(p.to_path_buf());
        }
    }
    Ok(())
}
