use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use askama::Template;
use tempfile::{NamedTempFile, TempPath};
use tracing::{info, warn};

use crate::template::{
    ExpectationHeaderTemplate, ExpectationSourceTemplate, Heading, MockSourceTemplate,
};
use crate::{
    Classifier, Config, DeclarationSet, Diagnostic, Error, ExpectationMode, FrontEnd,
    ParseRequest, Result, Severity, collect_declarations,
};

const CPP_EXTENSIONS: [&str; 3] = ["hpp", "hxx", "hh"];

/// A builder used to generate mocks and expectations for a header.
#[non_exhaustive]
#[derive(Default, Debug, Clone)]
pub struct MockGenerator {
    interpret_as_cpp: bool,
    cpp11: bool,
    underlying_typedef: bool,
    includes: Vec<PathBuf>,
    extra_includes: Vec<PathBuf>,
    param_overrides: Vec<String>,
    type_overrides: Vec<String>,
    generation_options: Option<String>,
}

impl MockGenerator {
    /// Creates a new blank generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the input as C++ whatever its extension.
    pub fn interpret_as_cpp(&mut self, interpret_as_cpp: bool) -> &mut Self {
        self.interpret_as_cpp = interpret_as_cpp;
        self
    }

    /// Ask the front-end for C++11.
    pub fn cpp11(&mut self, cpp11: bool) -> &mut Self {
        self.cpp11 = cpp11;
        self
    }

    /// Look up typedefs through their underlying type when matching type rules.
    pub fn underlying_typedef(&mut self, underlying_typedef: bool) -> &mut Self {
        self.underlying_typedef = underlying_typedef;
        self
    }

    /// Add a directory to the header lookup path.
    pub fn include<P: AsRef<Path>>(&mut self, p: P) -> &mut Self {
        self.includes.push(p.as_ref().to_owned());
        self
    }

    /// Add a header to be included before the input.
    pub fn extra_include<P: AsRef<Path>>(&mut self, p: P) -> &mut Self {
        self.extra_includes.push(p.as_ref().to_owned());
        self
    }

    /// Add a parameter or function-return override such as `f#p=Int`.
    pub fn param_override(&mut self, rule: &str) -> &mut Self {
        self.param_overrides.push(rule.to_string());
        self
    }

    /// Add a type override such as `#const Point *=ConstPointer`.
    pub fn type_override(&mut self, rule: &str) -> &mut Self {
        self.type_overrides.push(rule.to_string());
        self
    }

    /// Overrides the option summary recorded in the heading of generated files.
    pub fn generation_options(&mut self, options: &str) -> &mut Self {
        self.generation_options = Some(options.to_string());
        self
    }

    /// The option summary recorded in the heading of generated files.
    pub fn options_summary(&self) -> String {
        if let Some(options) = &self.generation_options {
            return options.clone();
        }
        let quote = |option: &str| {
            if option.contains(' ') {
                format!("\"{option}\"")
            } else {
                option.to_string()
            }
        };

        let mut parts = Vec::new();
        if self.interpret_as_cpp {
            parts.push("-x".to_string());
        }
        if self.underlying_typedef {
            parts.push("-u".to_string());
        }
        parts.extend(self.param_overrides.iter().map(|o| format!("-p {}", quote(o))));
        parts.extend(self.type_overrides.iter().map(|o| format!("-t {}", quote(o))));
        parts.join(" ")
    }

    /// Parses the override rules.
    pub fn config(&self) -> Result<Config> {
        Ok(Config::from_options(
            self.underlying_typedef,
            &self.param_overrides,
            &self.type_overrides,
        )?)
    }

    /// Whether `input` is parsed as C++.
    pub fn is_cpp(&self, input: &Path) -> bool {
        self.interpret_as_cpp
            || input
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| CPP_EXTENSIONS.contains(&e))
    }

    /// Parses `input` with `frontend` and analyzes every declaration it
    /// contains.
    pub fn session<P: AsRef<Path>>(&self, frontend: &dyn FrontEnd, input: P) -> Result<Session> {
        let input = input.as_ref();
        let config = self.config()?;

        if !input.is_file() {
            return Err(Error::Input(format!(
                "Input file '{}' could not be read.",
                input.display()
            )));
        }

        let interpret_as_cpp = self.is_cpp(input);
        info!(input = %input.display(), interpret_as_cpp, "parsing");
        let unit = frontend.parse(&ParseRequest {
            input,
            interpret_as_cpp,
            cpp11: self.cpp11,
            include_paths: &self.includes,
            extra_includes: &self.extra_includes,
        })?;

        let (errors, warnings): (Vec<Diagnostic>, Vec<Diagnostic>) = unit
            .diagnostics
            .iter()
            .filter(|d| d.severity != Severity::Note)
            .cloned()
            .partition(|d| d.severity.is_error());
        for diagnostic in &warnings {
            warn!(message = %diagnostic.message, "parse warning");
        }
        if !errors.is_empty() {
            return Err(Error::Parse {
                path: input.to_owned(),
                errors,
                warnings,
            });
        }

        let declarations =
            DeclarationSet::new(collect_declarations(&unit), &Classifier::new(&config));
        info!(
            mockable = declarations.len(),
            unmockable = declarations.unmockable().len(),
            "analyzed declarations"
        );
        if declarations.is_empty() {
            return Err(Error::NothingToMock {
                path: input.to_owned(),
            });
        }

        Ok(Session {
            input: input.to_owned(),
            interpret_as_cpp,
            generation_options: self.options_summary(),
            config,
            declarations,
            warnings,
        })
    }
}

/// The analyzed contents of one input file.
#[derive(Debug)]
pub struct Session {
    input: PathBuf,
    interpret_as_cpp: bool,
    generation_options: String,
    config: Config,
    declarations: DeclarationSet,
    warnings: Vec<Diagnostic>,
}

impl Session {
    /// The parsed header.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Whether the header was parsed as C++.
    pub fn interpret_as_cpp(&self) -> bool {
        self.interpret_as_cpp
    }

    /// The override rules in effect.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The analyzed declarations.
    pub fn declarations(&self) -> &DeclarationSet {
        &self.declarations
    }

    /// Warnings reported by the front-end.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    fn header_name(&self) -> String {
        file_name(&self.input)
    }

    /// The translation unit defining the mocks.
    pub fn mock_source(&self) -> Result<String> {
        let header_name = self.header_name();
        Ok(MockSourceTemplate::new(
            Heading::new(&self.generation_options),
            &header_name,
            self.interpret_as_cpp,
            self.declarations.mocks(),
        )
        .render()?)
    }

    /// The header declaring the expectation functions.
    pub fn expectation_header(&self) -> Result<String> {
        let header_name = self.header_name();
        Ok(ExpectationHeaderTemplate::new(
            Heading::new(&self.generation_options),
            &header_name,
            self.interpret_as_cpp,
            self.declarations.expectations(ExpectationMode::Header),
        )
        .render()?)
    }

    /// The source file defining the expectation functions, including the
    /// expectation header `header_name`.
    pub fn expectation_source(&self, header_name: &str) -> Result<String> {
        Ok(ExpectationSourceTemplate::new(
            Heading::new(&self.generation_options),
            header_name,
            self.declarations.expectations(ExpectationMode::Implementation),
        )
        .render()?)
    }

    /// Renders every requested output, then writes them.
    ///
    /// Files are first written next to their destination under temporary
    /// names and only renamed into place once every output has been rendered
    /// and written. If renaming any of them fails, the files already renamed
    /// are removed and whatever they replaced is put back. Standard output
    /// receives its share last.
    pub fn write(&self, paths: &OutputPaths, stdout: &mut dyn Write) -> Result<GeneratedFiles> {
        let mut rendered: Vec<(&Destination, String)> = Vec::new();
        if let Some(mock) = &paths.mock {
            rendered.push((mock, self.mock_source()?));
        }
        if let Some((header, source)) = &paths.expectation {
            let header_name = match header {
                Destination::File(path) => file_name(path),
                Destination::Stdout => format!("{}_expect.hpp", file_stem(&self.input)),
            };
            rendered.push((header, self.expectation_header()?));
            rendered.push((source, self.expectation_source(&header_name)?));
        }

        let mut staged = Vec::new();
        for (destination, contents) in &rendered {
            if let Destination::File(path) = destination {
                staged.push((path, stage(path, contents)?));
            }
        }
        commit(staged)?;
        for (destination, contents) in &rendered {
            if let Destination::Stdout = destination {
                stdout.write_all(contents.as_bytes())?;
            }
        }

        Ok(GeneratedFiles {
            mock: paths.mock.as_ref().and_then(Destination::file).cloned(),
            expectation: paths.expectation.as_ref().and_then(|(header, source)| {
                Some((header.file()?.clone(), source.file()?.clone()))
            }),
        })
    }
}

/// Writes `contents` to a temporary file in the directory of `path`.
fn stage(path: &Path, contents: &str) -> Result<NamedTempFile> {
    let output_error = |source| Error::Output {
        path: path.to_owned(),
        source,
    };
    let mut file = tempfile::Builder::new()
        .prefix(".cppumockgen")
        .tempfile_in(parent_dir(path))
        .map_err(output_error)?;
    file.write_all(contents.as_bytes()).map_err(output_error)?;
    Ok(file)
}

/// A destination that has received its new contents, with the file it
/// replaced moved aside.
struct Committed<'a> {
    path: &'a Path,
    previous: Option<TempPath>,
}

/// Renames every staged file onto its destination, all or nothing.
fn commit(staged: Vec<(&PathBuf, NamedTempFile)>) -> Result<()> {
    let mut committed: Vec<Committed<'_>> = Vec::with_capacity(staged.len());
    for (path, file) in staged {
        let previous = match set_aside(path) {
            Ok(previous) => previous,
            Err(e) => {
                roll_back(committed);
                return Err(e);
            }
        };
        if let Err(e) = file.persist(path) {
            if let Some(previous) = previous {
                put_back(path, previous);
            }
            roll_back(committed);
            return Err(Error::Output {
                path: path.clone(),
                source: e.error,
            });
        }
        committed.push(Committed {
            path: path.as_path(),
            previous,
        });
    }
    for Committed { path, .. } in committed {
        info!(path = %path.display(), "written");
    }
    Ok(())
}

/// Moves an existing regular file at `path` to a temporary name next to it.
fn set_aside(path: &Path) -> Result<Option<TempPath>> {
    let output_error = |source| Error::Output {
        path: path.to_owned(),
        source,
    };
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_file() => {}
        _ => return Ok(None),
    }
    let backup = tempfile::Builder::new()
        .prefix(".cppumockgen")
        .tempfile_in(parent_dir(path))
        .map_err(output_error)?
        .into_temp_path();
    fs::rename(path, &backup).map_err(output_error)?;
    Ok(Some(backup))
}

/// Undoes `committed` in reverse order.
fn roll_back(committed: Vec<Committed<'_>>) {
    for Committed { path, previous } in committed.into_iter().rev() {
        match previous {
            Some(previous) => put_back(path, previous),
            None => {
                if let Err(e) = fs::remove_file(path) {
                    if e.kind() != io::ErrorKind::NotFound {
                        warn!(path = %path.display(), error = %e, "cannot remove after failed write");
                    }
                }
            }
        }
    }
}

/// Moves a file set aside by [`set_aside`] back to `path`.
fn put_back(path: &Path, previous: TempPath) {
    if let Err(e) = previous.persist(path) {
        warn!(path = %path.display(), error = %e.error, "cannot restore after failed write");
    }
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Where one output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Standard output, requested with `@`.
    Stdout,
    /// A file.
    File(PathBuf),
}

impl Destination {
    /// The file path, unless this is standard output.
    pub fn file(&self) -> Option<&PathBuf> {
        match self {
            Destination::File(path) => Some(path),
            Destination::Stdout => None,
        }
    }
}

/// Destinations of the requested outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputPaths {
    /// The mock source, if requested.
    pub mock: Option<Destination>,
    /// The expectation header and source, if requested.
    pub expectation: Option<(Destination, Destination)>,
}

impl OutputPaths {
    /// Derives destinations from the `-m` and `-e` option values.
    ///
    /// `@` means standard output. An empty value or a directory places
    /// `<stem>_mock.cpp`, `<stem>_expect.hpp` and `<stem>_expect.cpp` there.
    /// Any other expectation path has its extension replaced by `.hpp` and
    /// `.cpp`.
    pub fn resolve(input: &Path, mock: Option<&str>, expectation: Option<&str>) -> Self {
        let stem = file_stem(input);

        let mock = mock.map(|option| match option {
            "@" => Destination::Stdout,
            dir if is_dir_option(dir) => {
                Destination::File(Path::new(dir).join(format!("{stem}_mock.cpp")))
            }
            path => Destination::File(PathBuf::from(path)),
        });

        let expectation = expectation.map(|option| match option {
            "@" => (Destination::Stdout, Destination::Stdout),
            dir if is_dir_option(dir) => (
                Destination::File(Path::new(dir).join(format!("{stem}_expect.hpp"))),
                Destination::File(Path::new(dir).join(format!("{stem}_expect.cpp"))),
            ),
            path => {
                let path = Path::new(path);
                (
                    Destination::File(path.with_extension("hpp")),
                    Destination::File(path.with_extension("cpp")),
                )
            }
        });

        Self { mock, expectation }
    }
}

fn is_dir_option(option: &str) -> bool {
    option.is_empty() || option.ends_with(['/', '\\']) || Path::new(option).is_dir()
}

/// The files written by [`Session::write`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedFiles {
    /// The mock source.
    pub mock: Option<PathBuf>,
    /// The expectation header and source.
    pub expectation: Option<(PathBuf, PathBuf)>,
}
