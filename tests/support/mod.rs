#![allow(dead_code)]

use std::collections::VecDeque;

use kit::interaction::Interaction;
use kit::KitError;

/// One scripted answer to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    Eof,
    Interrupt,
}

pub fn line(text: &str) -> Input {
    Input::Line(text.to_string())
}

/// Everything shown to the user, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Info(String),
    Success(String),
    Warn(String),
    Error(String),
    Reply(String),
}

/// [`Interaction`] fed from a script; running out of script reads as end of input.
#[derive(Debug, Default)]
pub struct ScriptedInteraction {
    inputs: VecDeque<Input>,
    pub outputs: Vec<Output>,
    pub line_prompts: usize,
    pub questions: usize,
}

impl ScriptedInteraction {
    pub fn new(inputs: impl IntoIterator<Item = Input>) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.outputs
            .iter()
            .filter_map(|output| match output {
                Output::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<&str> {
        self.outputs
            .iter()
            .filter_map(|output| match output {
                Output::Success(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn infos(&self) -> Vec<&str> {
        self.outputs
            .iter()
            .filter_map(|output| match output {
                Output::Info(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn replies(&self) -> Vec<&str> {
        self.outputs
            .iter()
            .filter_map(|output| match output {
                Output::Reply(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn next_input(&mut self) -> Input {
        self.inputs.pop_front().unwrap_or(Input::Eof)
    }
}

impl Interaction for ScriptedInteraction {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, KitError> {
        self.line_prompts += 1;
        match self.next_input() {
            Input::Line(text) => Ok(Some(text)),
            Input::Eof => Ok(None),
            Input::Interrupt => Err(KitError::UserCancelled),
        }
    }

    fn ask_with_default(&mut self, _prompt: &str, default: &str) -> Result<String, KitError> {
        self.questions += 1;
        match self.next_input() {
            Input::Line(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            Input::Line(_) | Input::Eof => Ok(default.to_string()),
            Input::Interrupt => Err(KitError::UserCancelled),
        }
    }

    fn info(&mut self, message: &str) {
        self.outputs.push(Output::Info(message.to_string()));
    }

    fn success(&mut self, message: &str) {
        self.outputs.push(Output::Success(message.to_string()));
    }

    fn warn(&mut self, message: &str) {
        self.outputs.push(Output::Warn(message.to_string()));
    }

    fn error(&mut self, message: &str) {
        self.outputs.push(Output::Error(message.to_string()));
    }

    fn reply(&mut self, text: &str) {
        self.outputs.push(Output::Reply(text.to_string()));
    }
}
