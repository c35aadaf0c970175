//! Pattern evaluation.

use serde::Deserialize;
use std::collections::HashMap;

use crate::modifiers::{Modified, apply_steps};
use crate::pattern::{Node, Pattern, Qualifier};
use crate::placeholders;
use crate::random::RandomSource;
use crate::utils::GenerationError;
use crate::wordlist::WordlistProvider;

/// Post-processing applied to every generated password
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Replace runs of spaces with a single space
    pub collapse_whitespace: bool,
    /// Strip leading and trailing whitespace
    pub trim_output: bool,
}

/// Values bound during one generation, keyed by binding index
type Registry = HashMap<usize, String>;

/// Evaluates compiled patterns against a wordlist provider
#[derive(Debug, Clone)]
pub struct Generator<'a, W: ?Sized> {
    words: &'a W,
    config: GeneratorConfig,
}

impl<'a, W: WordlistProvider + ?Sized> Generator<'a, W> {
    pub fn new(words: &'a W) -> Self {
        Generator {
            words,
            config: GeneratorConfig::default(),
        }
    }

    pub fn with_config(words: &'a W, config: GeneratorConfig) -> Self {
        Generator { words, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Produce one password from `pattern`
    ///
    /// Random draws happen in textual order, so a seeded source always yields
    /// the same output. Any error aborts the whole call.
    pub fn generate<R: RandomSource + ?Sized>(
        &self,
        pattern: &Pattern,
        rng: &mut R,
    ) -> Result<String, GenerationError> {
        let mut registry = Registry::with_capacity(pattern.binding_count());
        let mut output = String::new();

        for node in pattern.nodes() {
            let Some(result) = self.resolve(node, &registry, rng)? else {
                continue;
            };
            tracing::trace!(
                binding = ?node.binding(),
                hidden = result.hidden,
                "resolved {:?}",
                result.value
            );
            output.push_str(result.output());
            if let Some(index) = node.binding() {
                registry.insert(index, result.value);
            }
        }

        let output = self.finish(output);
        tracing::debug!(pattern = pattern.source(), len = output.len(), "generated password");
        Ok(output)
    }

    /// Value of one node, or `None` when its qualifier left it out
    fn resolve<R: RandomSource + ?Sized>(
        &self,
        node: &Node,
        registry: &Registry,
        rng: &mut R,
    ) -> Result<Option<Modified>, GenerationError> {
        if let Node::Literal(text) = node {
            return Ok(Some(Modified::new(text.clone())));
        }
        if !included(node.qualifier(), rng) {
            return Ok(None);
        }

        let value = match node {
            Node::Literal(_) => unreachable!("literals return early"),
            Node::Placeholder(placeholder) => {
                let raw = placeholders::draw(&placeholder.kind, self.words, rng)?;
                apply_steps(&placeholder.modifiers, raw, rng)?
            }
            Node::Selection(group) => {
                let choice = rng.uniform_choice(group.alternatives.len());
                self.resolve(&group.alternatives[choice], registry, rng)?
                    .unwrap_or_default()
            }
            Node::Backreference(backref) => {
                let bound = registry
                    .get(&backref.index)
                    .ok_or(GenerationError::UndefinedBackreference {
                        index: backref.index,
                    })?;
                apply_steps(&backref.modifiers, bound.clone(), rng)?
            }
        };
        Ok(Some(value))
    }

    fn finish(&self, mut output: String) -> String {
        if self.config.collapse_whitespace {
            output = collapse_spaces(&output);
        }
        if self.config.trim_output {
            output = output.trim().to_string();
        }
        output
    }
}

/// Roll a node's qualifier; certain and absent qualifiers take no draw
fn included<R: RandomSource + ?Sized>(qualifier: Option<Qualifier>, rng: &mut R) -> bool {
    match qualifier {
        Some(q) if !q.is_certain() => rng.bernoulli(q.probability()),
        _ => true,
    }
}

fn collapse_spaces(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut previous_space = false;
    for c in text.chars() {
        if c == ' ' && previous_space {
            continue;
        }
        previous_space = c == ' ';
        output.push(c);
    }
    output
}

/// Produce one password from `pattern` with the default configuration
pub fn generate<W, R>(pattern: &Pattern, words: &W, rng: &mut R) -> Result<String, GenerationError>
where
    W: WordlistProvider + ?Sized,
    R: RandomSource + ?Sized,
{
    Generator::new(words).generate(pattern, rng)
}
