use std::fmt;

use bimap::BiMap;

/// Identifier for an [`Event`], stable for the lifetime of the [`EventSymbolTable`] that
/// allocated it. Events are compared and hashed by this id alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(pub(crate) u32);

impl EventId {
    /// Raw numeric index into the owning [`EventSymbolTable`].
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// An event together with the three boolean flags the supervisory-control literature
/// attaches to it: whether a supervisor may disable it, whether it is visible to the
/// supervisor, and whether the supervisor may force it to occur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub(crate) name: String,
    pub controllable: bool,
    pub observable: bool,
    pub forcible: bool,
}

impl Event {
    /// A fully controllable, observable, non-forcible event — the common case.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            controllable: true,
            observable: true,
            forcible: false,
        }
    }

    /// An event with explicit flags, e.g. for uncontrollable or unobservable events.
    pub fn with_flags(
        name: impl Into<String>,
        controllable: bool,
        observable: bool,
        forcible: bool,
    ) -> Self {
        Self {
            name: name.into(),
            controllable,
            observable,
            forcible,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Symbol table mapping event names to [`EventId`]s and back, alongside each event's flags.
/// Insertion is idempotent by name, mirroring the shared process-wide symbol table described
/// in spec §5: inserting an event whose name already exists returns the existing id rather
/// than creating a duplicate.
#[derive(Debug, Clone, Default)]
pub struct EventSymbolTable {
    events: Vec<Event>,
    by_name: BiMap<String, u32>,
    silent: Option<EventId>,
}

impl EventSymbolTable {
    /// Inserts `event`, reusing the existing id if an event of the same name is already
    /// present (the name's flags are *not* overwritten in that case).
    pub fn insert(&mut self, event: Event) -> EventId {
        if let Some(&id) = self.by_name.get_by_left(&event.name) {
            return EventId(id);
        }
        let id = self.events.len() as u32;
        self.by_name.insert(event.name.clone(), id);
        self.events.push(event);
        EventId(id)
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: EventId) -> Option<&mut Event> {
        self.events.get_mut(id.0 as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<EventId> {
        self.by_name.get_by_left(name).map(|&i| EventId(i))
    }

    pub fn name(&self, id: EventId) -> Option<&str> {
        self.get(id).map(Event::name)
    }

    /// Inserts the silent (epsilon) event idempotently: if one was already designated, or an
    /// event of the given name already exists, its id is reused and (re-)recorded as silent.
    /// Otherwise a fresh non-controllable, non-observable, non-forcible event is created.
    /// See spec §4.3 and §5 — this must not clash with an existing event of a different
    /// identity, and repeated calls must be side-effect free.
    pub fn ensure_silent_event(&mut self, name: &str) -> EventId {
        if let Some(id) = self.silent {
            return id;
        }
        let id = if let Some(existing) = self.id_by_name(name) {
            existing
        } else {
            self.insert(Event::with_flags(name, false, false, false))
        };
        self.silent = Some(id);
        id
    }

    /// The id designated as the silent event, if [`Self::ensure_silent_event`] was ever called.
    pub fn silent_event(&self) -> Option<EventId> {
        self.silent
    }

    /// True iff `id` is the designated silent event. Used in place of the substring-on-name
    /// heuristic the original implementation relied on (spec §9).
    pub fn is_silent(&self, id: EventId) -> bool {
        self.silent == Some(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EventId, &Event)> {
        self.events
            .iter()
            .enumerate()
            .map(|(i, e)| (EventId(i as u32), e))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
