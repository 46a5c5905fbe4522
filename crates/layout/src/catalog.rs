//! The built-in widget catalog of the operations console.

use divedash_protocol::{Priority, Role};

use crate::registry::{ConfigField, Size, WidgetDefinition};

const MANAGEMENT: &[Role] = &[
    Role::Supervisor,
    Role::AdminSalmonera,
    Role::AdminServicio,
    Role::Superuser,
];
const MAINTENANCE: &[Role] = &[Role::Supervisor, Role::AdminServicio, Role::Superuser];
const COMPANY: &[Role] = &[Role::AdminSalmonera, Role::AdminServicio, Role::Superuser];
const SERVICE: &[Role] = &[Role::AdminServicio, Role::Superuser];
const ACTIVITY: &[Role] = &[Role::Superuser, Role::AdminSalmonera, Role::AdminServicio];

pub(crate) fn builtin_definitions() -> Vec<WidgetDefinition> {
    vec![
        WidgetDefinition::new("kpi-cards", "Key indicators", Size::new(12, 4))
            .priority(Priority::High)
            .with_config(
                "Key indicators",
                vec![
                    ConfigField::toggle("show_immersions", "Immersions", true),
                    ConfigField::toggle("show_hours", "Bottom hours", true),
                    ConfigField::toggle("show_incidents", "Incidents", true),
                    ConfigField::toggle("show_trends", "Trend arrows", false),
                ],
            ),
        WidgetDefinition::new("weather", "Weather", Size::new(4, 6)).with_config(
            "Weather",
            vec![
                ConfigField::text("location", "Location", 40, "Puerto Montt"),
                ConfigField::choice("units", "Units", &["metric", "imperial"], "metric"),
                ConfigField::toggle("show_tides", "Tides", true),
            ],
        ),
        WidgetDefinition::new("calendar", "Calendar", Size::new(8, 8))
            .heavy()
            .with_config(
                "Calendar",
                vec![
                    ConfigField::choice("view", "View", &["month", "week", "agenda"], "month"),
                    ConfigField::toggle("show_immersions", "Immersions", true),
                ],
            ),
        WidgetDefinition::new("notifications", "Notifications", Size::new(4, 8)).with_config(
            "Notifications",
            vec![
                ConfigField::number("max_items", "Items shown", 1, 50, 10),
                ConfigField::toggle("only_unread", "Only unread", false),
            ],
        ),
        WidgetDefinition::new("operations-summary", "Operations summary", Size::new(6, 6))
            .visible_to(MANAGEMENT),
        WidgetDefinition::new("immersions-chart", "Immersions chart", Size::new(6, 6))
            .heavy()
            .priority(Priority::Low)
            .with_config(
                "Immersions chart",
                vec![
                    ConfigField::choice("range", "Range", &["week", "month", "quarter"], "month"),
                    ConfigField::choice("group_by", "Group by", &["diver", "site"], "site"),
                ],
            ),
        WidgetDefinition::new("recent-immersions", "Recent immersions", Size::new(6, 6)),
        WidgetDefinition::new("network-maintenance", "Net maintenance", Size::new(6, 6))
            .visible_to(MAINTENANCE),
        WidgetDefinition::new("diver-profile", "My profile", Size::new(4, 6))
            .priority(Priority::High)
            .visible_to(&[Role::Diver]),
        WidgetDefinition::new("quick-actions", "Quick actions", Size::new(12, 2))
            .priority(Priority::High)
            .pinned(),
        WidgetDefinition::new("company-overview", "Company overview", Size::new(6, 6))
            .heavy()
            .visible_to(COMPANY),
        WidgetDefinition::new("service-status", "Service status", Size::new(6, 4))
            .visible_to(SERVICE),
        WidgetDefinition::new("system-health", "System health", Size::new(6, 6))
            .heavy()
            .priority(Priority::Low)
            .visible_to(&[Role::Superuser]),
        WidgetDefinition::new("user-activity", "User activity", Size::new(6, 6))
            .heavy()
            .priority(Priority::Low)
            .visible_to(ACTIVITY),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::WidgetConfigSpec;

    #[test]
    fn editors_have_non_empty_schemas() {
        for def in builtin_definitions() {
            if let WidgetConfigSpec::WithConfig { schema, .. } = &def.config {
                assert!(!schema.fields.is_empty(), "{} has an empty schema", def.id);
                let defaults = schema.defaults();
                assert_eq!(
                    schema.sanitize(def.id, &defaults).expect("defaults are valid"),
                    defaults
                );
            }
        }
    }

    #[test]
    fn only_quick_actions_is_static() {
        let pinned: Vec<_> = builtin_definitions()
            .into_iter()
            .filter(|d| d.is_static)
            .map(|d| d.id)
            .collect();
        assert_eq!(pinned, vec!["quick-actions"]);
    }

    #[test]
    fn default_sizes_fit_the_widest_grid() {
        for def in builtin_definitions() {
            assert!(def.default_size.width >= 1 && def.default_size.width <= 12);
            assert!(def.default_size.height >= 1);
        }
    }
}
