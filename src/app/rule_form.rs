//! Rule creation form
//!
//! The form is a small state machine over a direction-dependent field list.
//! Inbound rules get source address and interface fields; outbound rules get
//! a destination address field instead. Nothing is validated while typing:
//! [`RuleForm::build_command`] validates everything at submit time and either
//! returns a complete [`UfwCommand`] or the first [`ValidationError`].

use crate::app::lists::SelectableList;
use crate::core::rule::{Direction, Protocol, RuleAction};
use crate::core::ufw::UfwCommand;
use crate::validators::{
    AddressField, ValidationError, validate_address, validate_interface, validate_port_spec,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strum::IntoEnumIterator;

pub const FORM_HELP: &str =
    "↑↓ to navigate, ←→ to change selection, type to edit, Enter to submit, Esc to cancel";

/// One row of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Port,
    Protocol,
    Action,
    Direction,
    Comment,
    SourceIp,
    DestinationIp,
    Interface,
}

impl Field {
    pub const fn label(self) -> &'static str {
        match self {
            Field::Port => "Port",
            Field::Protocol => "Protocol",
            Field::Action => "Action",
            Field::Direction => "Direction",
            Field::Comment => "Comment (Optional)",
            Field::SourceIp => "Source IP (Optional)",
            Field::DestinationIp => "Destination IP (Optional)",
            Field::Interface => "Interface (Optional)",
        }
    }
}

/// Field order for a direction.
pub fn fields_for_direction(direction: Direction) -> Vec<Field> {
    let mut fields = vec![
        Field::Port,
        Field::Protocol,
        Field::Action,
        Field::Direction,
        Field::Comment,
    ];
    match direction {
        Direction::In => fields.extend([Field::SourceIp, Field::Interface]),
        Direction::Out => fields.push(Field::DestinationIp),
    }
    fields
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleForm {
    port: String,
    comment: String,
    source_ip: String,
    destination_ip: String,
    protocol: SelectableList<Protocol>,
    action: SelectableList<RuleAction>,
    direction: SelectableList<Direction>,
    /// `None` first: no interface restriction
    interface: SelectableList<Option<String>>,
    fields: SelectableList<Field>,
}

impl RuleForm {
    /// A blank inbound form offering `interfaces` (plus "none").
    pub fn new(interfaces: &[String]) -> Self {
        let interface_options = std::iter::once(None)
            .chain(interfaces.iter().cloned().map(Some))
            .collect();

        Self {
            port: String::new(),
            comment: String::new(),
            source_ip: String::new(),
            destination_ip: String::new(),
            protocol: SelectableList::new(Protocol::iter().collect()),
            action: SelectableList::new(RuleAction::iter().collect()),
            direction: SelectableList::new(Direction::iter().collect()),
            interface: SelectableList::new(interface_options),
            fields: SelectableList::new(fields_for_direction(Direction::In)),
        }
    }

    pub fn fields(&self) -> &[Field] {
        self.fields.items()
    }

    pub fn focused_field(&self) -> Option<Field> {
        self.fields.focused().copied()
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol.focused().copied().unwrap_or_default()
    }

    pub fn action(&self) -> RuleAction {
        self.action.focused().copied().unwrap_or_default()
    }

    pub fn direction(&self) -> Direction {
        self.direction.focused().copied().unwrap_or_default()
    }

    pub fn interface(&self) -> Option<&str> {
        self.interface.focused().and_then(Option::as_deref)
    }

    /// Navigation and editing. Enter and Esc belong to the owner.
    pub fn handle_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Up => self.fields.prev(),
            KeyCode::Down => self.fields.next(),
            KeyCode::Left => self.cycle_choice(false),
            KeyCode::Right => self.cycle_choice(true),
            KeyCode::Backspace => {
                if let Some(text) = self.focused_text_mut() {
                    text.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(text) = self.focused_text_mut() {
                    text.push(c);
                }
            }
            _ => {}
        }
    }

    fn cycle_choice(&mut self, forward: bool) {
        fn step<T>(list: &mut SelectableList<T>, forward: bool) {
            if forward { list.next() } else { list.prev() }
        }

        match self.focused_field() {
            Some(Field::Protocol) => step(&mut self.protocol, forward),
            Some(Field::Action) => step(&mut self.action, forward),
            Some(Field::Interface) => step(&mut self.interface, forward),
            Some(Field::Direction) => {
                step(&mut self.direction, forward);
                self.fields.set_items(fields_for_direction(self.direction()));
            }
            _ => {}
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focused_field()? {
            Field::Port => Some(&mut self.port),
            Field::Comment => Some(&mut self.comment),
            Field::SourceIp => Some(&mut self.source_ip),
            Field::DestinationIp => Some(&mut self.destination_ip),
            Field::Protocol | Field::Action | Field::Direction | Field::Interface => None,
        }
    }

    fn value(&self, field: Field) -> String {
        match field {
            Field::Port => self.port.clone(),
            Field::Protocol => self.protocol().display_name().to_string(),
            Field::Action => self.action().display_name().to_string(),
            Field::Direction => self.direction().display_name().to_string(),
            Field::Comment => self.comment.clone(),
            Field::SourceIp => self.source_ip.clone(),
            Field::DestinationIp => self.destination_ip.clone(),
            Field::Interface => self.interface().unwrap_or_default().to_string(),
        }
    }

    /// Validates the form and synthesizes the ufw command.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure; no command is produced then.
    pub fn build_command(&self) -> Result<UfwCommand, ValidationError> {
        let protocol = self.protocol();
        let port = validate_port_spec(&self.port, protocol)?;

        let mut args: Vec<String> = vec![self.action().to_string()];

        match self.direction() {
            Direction::In => {
                if let Some(iface) = self.interface() {
                    let iface = validate_interface(iface)?;
                    args.extend(["in".to_string(), "on".to_string(), iface]);
                }
                let source = if self.source_ip.is_empty() {
                    "any"
                } else {
                    validate_address(&self.source_ip, AddressField::Source)?;
                    self.source_ip.as_str()
                };
                args.extend(["from", source, "to", "any"].map(String::from));
            }
            Direction::Out => {
                let destination = if self.destination_ip.is_empty() {
                    "any"
                } else {
                    validate_address(&self.destination_ip, AddressField::Destination)?;
                    self.destination_ip.as_str()
                };
                args.extend(["out", "from", "any", "to", destination].map(String::from));
            }
        }

        args.push("port".to_string());
        args.push(port.to_string());
        if let Some(proto) = protocol.proto_arg() {
            args.push("proto".to_string());
            args.push(proto.to_string());
        }

        if !self.comment.is_empty() {
            args.push("comment".to_string());
            args.push(self.comment.clone());
        }

        Ok(UfwCommand::new(args))
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .fields
            .iter_focus()
            .map(|(field, focused)| {
                let prefix = if focused { "> " } else { "  " };
                format!("{prefix}{}: {}", field.label(), self.value(*field))
            })
            .collect();
        lines.push(String::new());
        lines.push(FORM_HELP.to_string());
        lines
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_key() -> impl Strategy<Value = KeyCode> {
        prop_oneof![
            Just(KeyCode::Up),
            Just(KeyCode::Down),
            Just(KeyCode::Left),
            Just(KeyCode::Right),
            Just(KeyCode::Backspace),
            proptest::char::range('0', ':').prop_map(KeyCode::Char),
        ]
    }

    proptest! {
        #[test]
        fn test_fields_always_match_direction(keys in proptest::collection::vec(arb_key(), 0..60)) {
            let mut form = RuleForm::new(&["eth0".to_string()]);
            for code in keys {
                form.handle_key(&KeyEvent::new(code, KeyModifiers::NONE));
                let expected = fields_for_direction(form.direction());
                prop_assert_eq!(form.fields(), expected.as_slice());
                prop_assert!(form.focused_field().is_some());
            }
        }

        #[test]
        fn test_no_command_from_invalid_port(port in "[0-9:]{0,12}") {
            let mut form = RuleForm::new(&[]);
            form.port.clone_from(&port);
            let valid = validate_port_spec(&port, form.protocol()).is_ok();
            prop_assert_eq!(form.build_command().is_ok(), valid);
        }
    }
}
