//! Rendered view model.
//!
//! A [`View`] is a flat list of elements produced by
//! [`Dashboard::render`](crate::Dashboard::render). It carries everything a
//! front end needs to draw the page and to offer the clickable buttons.

use colored::Colorize;
use std::fmt;

/// Identifies a clickable control
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ButtonId {
    /// Connect through the connector with this id
    Connect(String),
    /// Disconnect the active session
    Disconnect,
    /// Submit the sample proposal
    CreateProposal,
    /// Vote for the demo proposal
    VoteFor,
    /// Vote against the demo proposal
    VoteAgainst,
}

/// Visual emphasis of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    /// Neutral action
    Primary,
    /// Destructive or negative action
    Danger,
    /// Affirmative action
    Success,
}

/// A rendered button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// What clicking does
    pub id: ButtonId,
    /// Displayed label
    pub label: String,
    /// Whether clicking is currently allowed
    pub disabled: bool,
    /// Visual emphasis
    pub style: ButtonStyle,
}

impl Button {
    /// An enabled button
    pub fn new(id: ButtonId, label: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            id,
            label: label.into(),
            disabled: false,
            style,
        }
    }

    /// Set the disabled flag
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// One element of the page, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// Section heading
    Heading(String),
    /// Plain text
    Text(String),
    /// Clickable control
    Button(Button),
    /// Inline error shown beneath the control that caused it
    Error(String),
}

/// The whole page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Page title
    pub title: String,
    /// Page content
    pub elements: Vec<Element>,
}

impl View {
    /// Empty page with a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            elements: Vec::new(),
        }
    }

    /// Append an element
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// All buttons, in display order
    pub fn buttons(&self) -> Vec<&Button> {
        self.elements
            .iter()
            .filter_map(|element| match element {
                Element::Button(button) => Some(button),
                _ => None,
            })
            .collect()
    }

    /// Buttons that can be clicked right now
    pub fn enabled_buttons(&self) -> Vec<&Button> {
        self.buttons()
            .into_iter()
            .filter(|button| !button.disabled)
            .collect()
    }

    /// Find a button by id
    pub fn button(&self, id: &ButtonId) -> Option<&Button> {
        self.buttons().into_iter().find(|button| &button.id == id)
    }

    /// Inline error messages
    pub fn errors(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|element| match element {
                Element::Error(message) => Some(message.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Plain text lines
    pub fn texts(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|element| match element {
                Element::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Colored rendering for a terminal
    pub fn paint(&self) -> String {
        let mut out = format!("{}\n", self.title.bold().underline());
        for element in &self.elements {
            let line = match element {
                Element::Heading(heading) => format!("\n{}", heading.bold()),
                Element::Text(text) => text.clone(),
                Element::Error(message) => message.red().to_string(),
                Element::Button(button) => {
                    let label = format!("[ {} ]", button.label);
                    if button.disabled {
                        label.dimmed().to_string()
                    } else {
                        match button.style {
                            ButtonStyle::Primary => label.blue().to_string(),
                            ButtonStyle::Danger => label.red().to_string(),
                            ButtonStyle::Success => label.green().to_string(),
                        }
                    }
                }
            };
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for element in &self.elements {
            match element {
                Element::Heading(heading) => writeln!(f, "\n{}", heading)?,
                Element::Text(text) => writeln!(f, "{}", text)?,
                Element::Error(message) => writeln!(f, "{}", message)?,
                Element::Button(button) if button.disabled => {
                    writeln!(f, "[ {} ] (disabled)", button.label)?
                }
                Element::Button(button) => writeln!(f, "[ {} ]", button.label)?,
            }
        }
        Ok(())
    }
}
