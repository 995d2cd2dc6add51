//! Navigation controls hosted by the active column header.
//!
//! The container is built once and reparented on every activation, so the
//! listeners bound to its widgets stay attached across moves.

use crate::dom::{Element, Host};
use crate::error::Result;
use crate::registry::ColumnRegistry;
use crate::types::{classes, Column, ControlKind, Options};

/// The shared controls container and the widgets inside it.
#[derive(Debug, Clone)]
pub struct Controls<E> {
    pub container: E,
    pub select: Option<E>,
    pub label: Option<E>,
    pub title: Option<E>,
    pub prev: Option<E>,
    pub next: Option<E>,
}

impl<E: Element> Controls<E> {
    /// Build the widgets listed in `options.controls`, in that order.
    ///
    /// Returns `None` when no controls are configured.
    ///
    /// # Errors
    /// Environment error when the host cannot create an element.
    pub fn build<H>(
        host: &H,
        registry: &ColumnRegistry<E>,
        options: &Options,
        table_id: &str,
    ) -> Result<Option<Self>>
    where
        H: Host<Element = E>,
    {
        if options.controls.is_empty() {
            return Ok(None);
        }

        let container = host.create_element("div")?;
        container.add_class(classes::CONTROLS);
        let mut controls = Self {
            container,
            select: None,
            label: None,
            title: None,
            prev: None,
            next: None,
        };
        let select_id = classes::select_id(table_id);

        for kind in &options.controls {
            let element = match kind {
                ControlKind::Select => {
                    let select = host.create_element("select")?;
                    select.set_attribute("id", &select_id);
                    select.add_class(classes::SELECT);
                    for column in registry.iter() {
                        let option = host.create_element("option")?;
                        option.set_attribute("value", &column.index.to_string());
                        option.set_inner_html(&column.title);
                        if options.has_sticky() && column.index == options.sticky_index {
                            option.set_attribute("disabled", "disabled");
                        }
                        select.append_child(&option);
                    }
                    controls.select.insert(select)
                }
                ControlKind::Label => {
                    let label = host.create_element("label")?;
                    label.add_class(classes::LABEL);
                    label.set_attribute("for", &select_id);
                    label.set_inner_html(&options.label_html);
                    controls.label.insert(label)
                }
                ControlKind::Title => {
                    let title = host.create_element("span")?;
                    title.add_class(classes::TITLE);
                    controls.title.insert(title)
                }
                ControlKind::Prev => {
                    let prev = button(host, classes::PREV, &options.prev_html)?;
                    controls.prev.insert(prev)
                }
                ControlKind::Next => {
                    let next = button(host, classes::NEXT, &options.next_html)?;
                    controls.next.insert(next)
                }
            };
            controls.container.append_child(element);
        }

        Ok(Some(controls))
    }

    /// Sync the selector and title with `column` and move the container into
    /// its header cell, replacing the displayed title.
    pub fn present(&self, column: &Column<E>) {
        if let Some(select) = &self.select {
            select.set_value(&column.index.to_string());
        }
        if let Some(title) = &self.title {
            title.set_inner_html(&column.title);
        }
        column.header_cell.set_inner_html("");
        column.header_cell.append_child(&self.container);
    }
}

fn button<H: Host>(host: &H, class: &str, html: &str) -> Result<H::Element> {
    let button = host.create_element("button")?;
    button.set_attribute("type", "button");
    button.add_class(class);
    button.set_inner_html(html);
    Ok(button)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::dom::memory::{MemoryElement, MemoryHost};

    fn setup(options: &Options) -> (MemoryHost, ColumnRegistry<MemoryElement>) {
        let host = MemoryHost::new();
        let table = host.table(&["Name", "Alpha", "Beta"], &[vec!["a", "b", "c"]]);
        let registry = ColumnRegistry::build(&host, &table).unwrap();
        options.validate(registry.len()).unwrap();
        (host, registry)
    }

    #[test]
    fn test_build_in_configured_order() {
        let options = Options {
            controls: vec![
                ControlKind::Label,
                ControlKind::Select,
                ControlKind::Prev,
                ControlKind::Title,
                ControlKind::Next,
            ],
            ..Options::default()
        };
        let (host, registry) = setup(&options);
        let controls = Controls::build(&host, &registry, &options, "abc123")
            .unwrap()
            .unwrap();

        let tags: Vec<String> = controls
            .container
            .children()
            .iter()
            .map(MemoryElement::tag)
            .collect();
        assert_eq!(tags, vec!["label", "select", "button", "span", "button"]);
        assert!(controls.container.has_class(classes::CONTROLS));

        let label = controls.label.unwrap();
        assert_eq!(label.attribute("for").as_deref(), Some("tabletrim-select-abc123"));
        assert_eq!(label.inner_html(), "Column: ");
        assert_eq!(
            controls.select.unwrap().attribute("id").as_deref(),
            Some("tabletrim-select-abc123")
        );
        assert_eq!(controls.prev.unwrap().inner_html(), "&lsaquo;");
        assert_eq!(controls.next.unwrap().inner_html(), "&rsaquo;");
    }

    #[test]
    fn test_select_lists_columns_and_disables_sticky() {
        let options = Options::default();
        let (host, registry) = setup(&options);
        let controls = Controls::build(&host, &registry, &options, "id").unwrap().unwrap();

        let options_el = controls.select.unwrap().children();
        assert_eq!(options_el.len(), 3);
        assert_eq!(options_el[0].attribute("disabled").as_deref(), Some("disabled"));
        assert!(options_el[1].attribute("disabled").is_none());
        assert_eq!(options_el[2].attribute("value").as_deref(), Some("3"));
        assert_eq!(options_el[2].inner_html(), "Beta");
    }

    #[test]
    fn test_no_sticky_leaves_every_option_enabled() {
        let options = Options {
            sticky_index: 0,
            init_index: 1,
            ..Options::default()
        };
        let (host, registry) = setup(&options);
        let controls = Controls::build(&host, &registry, &options, "id").unwrap().unwrap();
        assert!(controls
            .select
            .unwrap()
            .children()
            .iter()
            .all(|option| option.attribute("disabled").is_none()));
    }

    #[test]
    fn test_empty_controls_builds_nothing() {
        let options = Options {
            controls: Vec::new(),
            ..Options::default()
        };
        let (host, registry) = setup(&options);
        assert!(Controls::build(&host, &registry, &options, "id")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_present_moves_container_and_updates_widgets() {
        let options = Options {
            controls: vec![ControlKind::Select, ControlKind::Title],
            ..Options::default()
        };
        let (host, registry) = setup(&options);
        let controls = Controls::build(&host, &registry, &options, "id").unwrap().unwrap();

        let alpha = registry.get(2).unwrap();
        let beta = registry.get(3).unwrap();
        controls.present(alpha);
        assert!(alpha.header_cell.contains(&controls.container));

        controls.present(beta);
        assert!(beta.header_cell.contains(&controls.container));
        assert!(!alpha.header_cell.contains(&controls.container));
        assert_eq!(controls.select.as_ref().unwrap().value(), "3");
        assert_eq!(controls.title.as_ref().unwrap().inner_html(), "Beta");
    }
}
