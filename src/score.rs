//! Score files — YAML documents listing the lines of a piece.
//!
//! ```yaml
//! tempo: 120
//! lines:
//!   - name: melody
//!     notation: "(INST=inst4)C4D4rD4{2}"
//!   - name: bass
//!     tempo: 60
//!     notation:
//!       - "(DYNAM=1/2)"
//!       - repeat: 4
//!         parts: ["C3 r", "G2{2}"]
//! ```

use std::fmt;
use std::io;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::audio::{mix, render_lines, Mixdown};
use crate::dsl::{ParseError, PitchResolver};
use crate::line::{Line, RenderError};

/// A piece of notation text, optionally repeated.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Fragment {
    Text(String),
    Repeat { repeat: usize, parts: Vec<Fragment> },
}

impl Fragment {
    fn expand_into(&self, out: &mut String) {
        match self {
            Fragment::Text(text) => out.push_str(text),
            Fragment::Repeat { repeat, parts } => {
                for _ in 0..*repeat {
                    for part in parts {
                        part.expand_into(out);
                    }
                }
            }
        }
    }
}

/// A line's notation: one string, or fragments concatenated in order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum NotationSource {
    Text(String),
    Fragments(Vec<Fragment>),
}

impl NotationSource {
    /// The full composition string.
    pub fn expand(&self) -> String {
        match self {
            NotationSource::Text(text) => text.clone(),
            NotationSource::Fragments(fragments) => {
                let mut out = String::new();
                for fragment in fragments {
                    fragment.expand_into(&mut out);
                }
                out
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LineSpec {
    #[serde(default)]
    pub name: Option<String>,
    /// Overrides the score tempo for this line.
    #[serde(default)]
    pub tempo: Option<f64>,
    pub notation: NotationSource,
}

/// The on-disk form of a score.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoreFile {
    #[serde(default)]
    pub tempo: Option<f64>,
    #[serde(default)]
    pub lines: Vec<LineSpec>,
}

/// Errors from loading, rendering or writing a score.
#[derive(Debug)]
pub enum ScoreError {
    Io(io::Error),
    Yaml(serde_yaml::Error),
    /// A line's notation failed to parse. `line` is 0-based.
    Parse {
        line: usize,
        name: String,
        source: ParseError,
    },
    Render(RenderError),
    Wav(hound::Error),
    ThreadPool(rayon::ThreadPoolBuildError),
    InvalidTempo { line: usize, tempo: f64 },
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::Io(e) => write!(f, "io error: {e}"),
            ScoreError::Yaml(e) => write!(f, "invalid score file: {e}"),
            ScoreError::Parse { line, name, source } => {
                write!(f, "line {line} ({name}): {source}")
            }
            ScoreError::Render(e) => write!(f, "render failed: {e}"),
            ScoreError::Wav(e) => write!(f, "wav error: {e}"),
            ScoreError::ThreadPool(e) => write!(f, "thread pool error: {e}"),
            ScoreError::InvalidTempo { line, tempo } => {
                write!(f, "line {line}: tempo must be a positive number, got {tempo}")
            }
        }
    }
}

impl std::error::Error for ScoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScoreError::Io(e) => Some(e),
            ScoreError::Yaml(e) => Some(e),
            ScoreError::Parse { source, .. } => Some(source),
            ScoreError::Render(e) => Some(e),
            ScoreError::Wav(e) => Some(e),
            ScoreError::ThreadPool(e) => Some(e),
            ScoreError::InvalidTempo { .. } => None,
        }
    }
}

impl From<io::Error> for ScoreError {
    fn from(e: io::Error) -> Self {
        ScoreError::Io(e)
    }
}

impl From<serde_yaml::Error> for ScoreError {
    fn from(e: serde_yaml::Error) -> Self {
        ScoreError::Yaml(e)
    }
}

impl From<RenderError> for ScoreError {
    fn from(e: RenderError) -> Self {
        ScoreError::Render(e)
    }
}

impl From<hound::Error> for ScoreError {
    fn from(e: hound::Error) -> Self {
        ScoreError::Wav(e)
    }
}

impl From<rayon::ThreadPoolBuildError> for ScoreError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        ScoreError::ThreadPool(e)
    }
}

/// A parsed score: every line ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    lines: Vec<Line>,
}

impl Score {
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Parse `(composition, base tempo)` pairs. Lines are named by position.
    pub fn from_compositions<'a>(
        compositions: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Result<Self, ScoreError> {
        let mut resolver = PitchResolver::new();
        let mut lines = Vec::new();
        for (index, (source, tempo)) in compositions.into_iter().enumerate() {
            lines.push(parse_line(
                index,
                format!("line {index}"),
                source,
                tempo,
                &mut resolver,
            )?);
        }
        Ok(Self { lines })
    }

    /// Parse every line of a score file. Lines share one pitch cache.
    pub fn from_score_file(file: &ScoreFile, default_tempo: f64) -> Result<Self, ScoreError> {
        let score_tempo = file.tempo.unwrap_or(default_tempo);
        let mut resolver = PitchResolver::new();
        let mut lines = Vec::with_capacity(file.lines.len());

        for (index, spec) in file.lines.iter().enumerate() {
            let name = spec
                .name
                .clone()
                .unwrap_or_else(|| format!("line {index}"));
            let tempo = spec.tempo.unwrap_or(score_tempo);
            let source = spec.notation.expand();
            lines.push(parse_line(index, name, &source, tempo, &mut resolver)?);
        }

        Ok(Self { lines })
    }

    pub fn from_yaml(yaml: &str, default_tempo: f64) -> Result<Self, ScoreError> {
        let file: ScoreFile = serde_yaml::from_str(yaml)?;
        Self::from_score_file(&file, default_tempo)
    }

    pub fn from_file(path: &Path, default_tempo: f64) -> Result<Self, ScoreError> {
        let content = std::fs::read_to_string(path)?;
        let score = Self::from_yaml(&content, default_tempo)?;
        info!(
            "loaded {} ({} lines, {} events)",
            path.display(),
            score.lines.len(),
            score.event_count()
        );
        Ok(score)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn event_count(&self) -> usize {
        self.lines.iter().map(|l| l.events().len()).sum()
    }

    /// Render every line in parallel on the current rayon pool and mix.
    pub fn render(&self) -> Result<Mixdown, ScoreError> {
        let buffers = render_lines(&self.lines)?;
        let mixdown = mix(&buffers);
        info!(
            "rendered {} frames ({:.2}s), peak {:.4}",
            mixdown.frames(),
            mixdown.duration_secs(),
            mixdown.peak()
        );
        Ok(mixdown)
    }

    /// Render on a dedicated pool of `threads` workers. 0 uses the global pool.
    pub fn render_with_threads(&self, threads: usize) -> Result<Mixdown, ScoreError> {
        if threads == 0 {
            return self.render();
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?;
        pool.install(|| self.render())
    }
}

fn parse_line(
    index: usize,
    name: String,
    source: &str,
    tempo: f64,
    resolver: &mut PitchResolver,
) -> Result<Line, ScoreError> {
    if !(tempo.is_finite() && tempo > 0.0) {
        return Err(ScoreError::InvalidTempo { line: index, tempo });
    }
    match Line::parse(name.as_str(), source, tempo, resolver) {
        Ok(line) => Ok(line),
        Err(source) => Err(ScoreError::Parse {
            line: index,
            name,
            source,
        }),
    }
}
