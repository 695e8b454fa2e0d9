use serde::Serialize;

use super::stats::ScanStats;

/// Which side of a violation a stack trace belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadSide {
    /// The core thread performing the unsynchronized read
    Core,
    /// The non-core thread whose earlier write is being read
    NonCore,
}

impl ThreadSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadSide::Core => "core",
            ThreadSide::NonCore => "non_core",
        }
    }
}

/// One `at class.method(file:line)` entry of a monitor stack trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackFrame {
    pub class: String,
    pub method: String,
    pub file: String,
    pub line: u32,
}

impl StackFrame {
    /// Method name with the JVM constructor / class-initializer brackets
    /// removed (`<init>` -> `init`, `<clinit>` -> `clinit`).
    pub fn display_method(&self) -> &str {
        match self.method.as_str() {
            "<init>" => "init",
            "<clinit>" => "clinit",
            other => other,
        }
    }

    /// `class.method` as printed by the JVM.
    pub fn qualified_method(&self) -> String {
        format!("{}.{}", self.class, self.method)
    }

    /// `Class.method:line N`, the attributed-location form.
    pub fn location(&self) -> String {
        format!("{}.{}:line {}", self.class, self.display_method(), self.line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadTrace {
    pub thread_name: String,
    /// Frames in log order (first printed, first stored)
    pub frames: Vec<StackFrame>,
    /// Frames cut by the monitor's depth limit (`... N more`)
    pub omitted_frames: usize,
}

impl ThreadTrace {
    pub fn new(thread_name: impl Into<String>) -> Self {
        Self {
            thread_name: thread_name.into(),
            frames: Vec::new(),
            omitted_frames: 0,
        }
    }

    pub fn first_frame(&self) -> Option<&StackFrame> {
        self.frames.first()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// A core thread reading a variable last written by a non-core thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub variable: String,
    pub core_thread: ThreadTrace,
    pub non_core_thread: ThreadTrace,
}

impl Violation {
    pub fn new(
        variable: impl Into<String>,
        core_thread: impl Into<String>,
        non_core_thread: impl Into<String>,
    ) -> Self {
        Self {
            variable: variable.into(),
            core_thread: ThreadTrace::new(core_thread),
            non_core_thread: ThreadTrace::new(non_core_thread),
        }
    }

    pub fn trace(&self, side: ThreadSide) -> &ThreadTrace {
        match side {
            ThreadSide::Core => &self.core_thread,
            ThreadSide::NonCore => &self.non_core_thread,
        }
    }

    pub fn trace_mut(&mut self, side: ThreadSide) -> &mut ThreadTrace {
        match side {
            ThreadSide::Core => &mut self.core_thread,
            ThreadSide::NonCore => &mut self.non_core_thread,
        }
    }
}

/// A method excluded from the check, identified by its declaring class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MethodRef {
    pub method: String,
    pub class: String,
}

/// A field identified by its declaring class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldRef {
    pub field: String,
    pub class: String,
}

/// Entities opted out of the thread-safety check via `@RsmThreadSafe`.
///
/// Behaves as a set; iteration order is the order entries first appeared in
/// the log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExclusionSet {
    pub classes: Vec<String>,
    pub methods: Vec<MethodRef>,
    pub fields: Vec<FieldRef>,
}

impl ExclusionSet {
    /// Returns false when the class was already recorded.
    pub fn add_class(&mut self, class: String) -> bool {
        insert_unique(&mut self.classes, class)
    }

    pub fn add_method(&mut self, method: MethodRef) -> bool {
        insert_unique(&mut self.methods, method)
    }

    pub fn add_field(&mut self, field: FieldRef) -> bool {
        insert_unique(&mut self.fields, field)
    }

    pub fn len(&self) -> usize {
        self.classes.len() + self.methods.len() + self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn insert_unique<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    if items.contains(&item) {
        return false;
    }
    items.push(item);
    true
}

/// Everything recovered from one monitor log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonitorLog {
    /// Violations in log order
    pub violations: Vec<Violation>,
    pub exclusions: ExclusionSet,
    /// Fields whose static-initialization writes are not treated as hazards
    pub ignored_static_inits: Vec<FieldRef>,
    pub stats: ScanStats,
}
