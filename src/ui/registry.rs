//! Component registry
//!
//! Components are registered once by name at startup. A single root component
//! is mounted into an anchor and composes the others by name each frame.

use super::View;
use eframe::egui;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

/// Name the Box container component is registered under.
pub const BOX: &str = "Box";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("component `{0}` is already registered")]
    DuplicateComponent(&'static str),
    #[error("root component `{0}` is already mounted")]
    AlreadyMounted(&'static str),
    #[error("invalid mount anchor `{0}`")]
    InvalidAnchor(String),
}

/// A named piece of UI.
pub trait Component {
    fn name(&self) -> &'static str;

    fn show(&mut self, ui: &mut egui::Ui, view: &mut View<'_>);

    /// Containers draw `contents` inside themselves; everything else just runs it.
    fn wrap(&mut self, ui: &mut egui::Ui, _title: &str, contents: &mut dyn FnMut(&mut egui::Ui)) {
        contents(ui);
    }
}

/// The component the application is rendered from.
pub trait Root {
    fn name(&self) -> &'static str;

    fn render(&mut self, ctx: &egui::Context, anchor: &str, components: &mut Components, view: &mut View<'_>);
}

/// Registered components, looked up by name.
#[derive(Default)]
pub struct Components {
    // Slots are emptied while a component is lent out to a container.
    slots: Vec<Option<Box<dyn Component>>>,
    index: HashMap<&'static str, usize>,
    reported_missing: HashSet<String>,
}

impl Components {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<(&'static str, usize)> = self.index.iter().map(|(n, i)| (*n, *i)).collect();
        names.sort_by_key(|(_, i)| *i);
        names.into_iter().map(|(n, _)| n).collect()
    }

    fn insert(&mut self, component: Box<dyn Component>) -> Result<(), RegistryError> {
        let name = component.name();
        if self.index.contains_key(name) {
            return Err(RegistryError::DuplicateComponent(name));
        }
        self.index.insert(name, self.slots.len());
        self.slots.push(Some(component));
        Ok(())
    }

    fn report_missing(&mut self, name: &str) {
        if self.reported_missing.insert(name.to_string()) {
            warn!(component = name, "Component is not registered");
        }
    }

    /// Render the component registered as `name`. Returns false if there is none.
    pub fn show(&mut self, name: &str, ui: &mut egui::Ui, view: &mut View<'_>) -> bool {
        let slot = self.index.get(name).and_then(|&i| self.slots[i].as_mut());
        match slot {
            Some(component) => {
                component.show(ui, view);
                true
            }
            None => {
                self.report_missing(name);
                false
            }
        }
    }

    /// Render `name` inside the Box container under `title`.
    pub fn show_boxed(&mut self, title: &str, name: &str, ui: &mut egui::Ui, view: &mut View<'_>) -> bool {
        let child_idx = self.index.get(name).copied();
        let box_idx = self.index.get(BOX).copied();
        let (Some(child_idx), Some(box_idx)) = (child_idx, box_idx) else {
            if !self.contains(BOX) {
                self.report_missing(BOX);
            }
            return self.show(name, ui, view);
        };
        if child_idx == box_idx {
            return self.show(name, ui, view);
        }

        let Some(mut child) = self.slots[child_idx].take() else {
            return false;
        };
        if let Some(container) = self.slots[box_idx].as_mut() {
            container.wrap(ui, title, &mut |ui| child.show(ui, view));
        }
        self.slots[child_idx] = Some(child);
        true
    }
}

#[derive(Default)]
pub struct Registry {
    components: Components,
    root: Option<(Box<dyn Root>, String)>,
}

impl Registry {
    pub fn register(&mut self, component: Box<dyn Component>) -> Result<(), RegistryError> {
        let name = component.name();
        self.components.insert(component)?;
        debug!(component = name, "Component registered");
        Ok(())
    }

    pub fn mount(&mut self, root: Box<dyn Root>, anchor: &str) -> Result<(), RegistryError> {
        if let Some((mounted, _)) = &self.root {
            return Err(RegistryError::AlreadyMounted(mounted.name()));
        }
        let anchor = anchor.trim_start_matches('#');
        if anchor.is_empty() || anchor.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidAnchor(anchor.to_string()));
        }
        debug!(root = root.name(), anchor, "Root component mounted");
        self.root = Some((root, anchor.to_string()));
        Ok(())
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    pub fn root_name(&self) -> Option<&'static str> {
        self.root.as_ref().map(|(r, _)| r.name())
    }

    pub fn anchor(&self) -> Option<&str> {
        self.root.as_ref().map(|(_, a)| a.as_str())
    }

    /// Render one frame from the mounted root.
    pub fn render(&mut self, ctx: &egui::Context, view: &mut View<'_>) {
        if let Some((root, anchor)) = self.root.as_mut() {
            root.render(ctx, anchor, &mut self.components, view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::tests::with_view;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Writes every call it gets to a shared log.
    struct Recorder {
        name: &'static str,
        log: Log,
    }

    impl Component for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn show(&mut self, _ui: &mut egui::Ui, _view: &mut View<'_>) {
            self.log.borrow_mut().push(format!("show {}", self.name));
        }

        fn wrap(&mut self, ui: &mut egui::Ui, title: &str, contents: &mut dyn FnMut(&mut egui::Ui)) {
            self.log.borrow_mut().push(format!("wrap {}", title));
            contents(ui);
        }
    }

    fn recorders(names: &[&'static str], log: &Log) -> Components {
        let mut components = Components::default();
        for &name in names {
            components
                .insert(Box::new(Recorder { name, log: log.clone() }))
                .unwrap();
        }
        components
    }

    /// Run `f` inside one headless frame.
    fn in_frame(mut f: impl FnMut(&mut egui::Ui, &mut View<'_>)) {
        let ctx = egui::Context::default();
        with_view(None, |view| {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| f(ui, view));
            });
        });
    }

    /// Root that puts one boxed component in the central panel.
    struct Page {
        log: Log,
    }

    impl Root for Page {
        fn name(&self) -> &'static str {
            "Page"
        }

        fn render(&mut self, ctx: &egui::Context, anchor: &str, components: &mut Components, view: &mut View<'_>) {
            self.log.borrow_mut().push(format!("root {}", anchor));
            egui::CentralPanel::default().show(ctx, |ui| {
                components.show_boxed("T", "Child", ui, view);
            });
        }
    }

    struct Named(&'static str);

    impl Component for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn show(&mut self, _ui: &mut egui::Ui, _view: &mut View<'_>) {}
    }

    struct Shell;

    impl Root for Shell {
        fn name(&self) -> &'static str {
            "Shell"
        }

        fn render(&mut self, _ctx: &egui::Context, _anchor: &str, _c: &mut Components, _view: &mut View<'_>) {}
    }

    #[test]
    fn registers_in_order() {
        let mut registry = Registry::default();
        registry.register(Box::new(Named("A"))).unwrap();
        registry.register(Box::new(Named("B"))).unwrap();
        assert_eq!(registry.components().names(), vec!["A", "B"]);
        assert_eq!(registry.components().len(), 2);
        assert!(registry.components().contains("A"));
        assert!(!registry.components().contains("C"));
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut registry = Registry::default();
        registry.register(Box::new(Named("A"))).unwrap();
        assert_eq!(
            registry.register(Box::new(Named("A"))),
            Err(RegistryError::DuplicateComponent("A"))
        );
        assert_eq!(registry.components().len(), 1);
    }

    #[test]
    fn mounts_exactly_one_root() {
        let mut registry = Registry::default();
        assert_eq!(registry.root_name(), None);
        registry.mount(Box::new(Shell), "#main").unwrap();
        assert_eq!(registry.anchor(), Some("main"));
        assert_eq!(registry.root_name(), Some("Shell"));
        assert_eq!(
            registry.mount(Box::new(Shell), "other"),
            Err(RegistryError::AlreadyMounted("Shell"))
        );
    }

    #[test]
    fn rejects_empty_anchor() {
        let mut registry = Registry::default();
        assert!(matches!(
            registry.mount(Box::new(Shell), "#"),
            Err(RegistryError::InvalidAnchor(_))
        ));
        assert_eq!(registry.root_name(), None);
    }

    #[test]
    fn boxed_child_is_drawn_inside_the_box() {
        let log = Log::default();
        let mut components = recorders(&[BOX, "Child"], &log);

        in_frame(|ui, view| {
            assert!(components.show_boxed("T", "Child", ui, view));
            // Lent out only while the box draws it
            assert!(components.show("Child", ui, view));
        });

        assert_eq!(*log.borrow(), vec!["wrap T", "show Child", "show Child"]);
    }

    #[test]
    fn without_a_box_the_child_is_drawn_plain() {
        let log = Log::default();
        let mut components = recorders(&["Child"], &log);

        in_frame(|ui, view| {
            assert!(components.show_boxed("T", "Child", ui, view));
        });

        assert_eq!(*log.borrow(), vec!["show Child"]);
        assert!(components.reported_missing.contains(BOX));
    }

    #[test]
    fn box_asked_to_box_itself_just_shows() {
        let log = Log::default();
        let mut components = recorders(&[BOX], &log);

        in_frame(|ui, view| {
            assert!(components.show_boxed("T", BOX, ui, view));
        });

        assert_eq!(*log.borrow(), vec!["show Box"]);
    }

    #[test]
    fn unknown_components_are_reported_once() {
        let log = Log::default();
        let mut components = recorders(&[BOX], &log);

        in_frame(|ui, view| {
            assert!(!components.show("Nope", ui, view));
            assert!(!components.show("Nope", ui, view));
            assert!(!components.show_boxed("T", "Nope", ui, view));
        });

        assert_eq!(components.reported_missing.len(), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn render_runs_the_mounted_root() {
        let log = Log::default();
        let mut registry = Registry::default();
        registry.register(Box::new(Recorder { name: BOX, log: log.clone() })).unwrap();
        registry.register(Box::new(Recorder { name: "Child", log: log.clone() })).unwrap();

        let ctx = egui::Context::default();
        with_view(None, |view| {
            let _ = ctx.run(egui::RawInput::default(), |ctx| registry.render(ctx, view));
        });
        assert!(log.borrow().is_empty(), "nothing is drawn before a root is mounted");

        registry.mount(Box::new(Page { log: log.clone() }), "#main").unwrap();
        with_view(None, |view| {
            let _ = ctx.run(egui::RawInput::default(), |ctx| registry.render(ctx, view));
        });
        assert_eq!(*log.borrow(), vec!["root main", "wrap T", "show Child"]);
    }
}
