//! Home menu, derived from the latest status snapshot

use crate::core::status::FirewallStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Enable,
    Disable,
    SetDefaults,
    Profiles,
    CreateRule,
    DeleteRule,
    Show,
    EnableLogging,
    DisableLogging,
    Reset,
    Quit,
}

impl MenuItem {
    pub const fn title(self) -> &'static str {
        match self {
            MenuItem::Enable => "Enable",
            MenuItem::Disable => "Disable",
            MenuItem::SetDefaults => "Set defaults",
            MenuItem::Profiles => "Profiles",
            MenuItem::CreateRule => "Create rule",
            MenuItem::DeleteRule => "Delete rule",
            MenuItem::Show => "Show",
            MenuItem::EnableLogging => "Enable logging",
            MenuItem::DisableLogging => "Disable logging",
            MenuItem::Reset => "Reset UFW",
            MenuItem::Quit => "Quit",
        }
    }
}

/// Menu entries for a firewall in `status`.
pub fn build_menu(status: FirewallStatus) -> Vec<MenuItem> {
    let mut items = Vec::new();

    if status.active {
        items.extend([
            MenuItem::Disable,
            MenuItem::SetDefaults,
            MenuItem::Profiles,
            MenuItem::CreateRule,
            MenuItem::DeleteRule,
            MenuItem::Show,
        ]);
        items.push(if status.logging {
            MenuItem::DisableLogging
        } else {
            MenuItem::EnableLogging
        });
    } else {
        items.push(MenuItem::Enable);
    }

    items.extend([MenuItem::Reset, MenuItem::Quit]);
    items
}
