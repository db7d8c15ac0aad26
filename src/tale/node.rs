use serde::{Deserialize, Serialize};

/// Kind of a tree node. Fixed at creation, never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
    #[serde(rename = "project")]
    Repository,
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Folder => "folder",
            NodeKind::Repository => "project",
        }
    }
}

/// One node of the output tree.
///
/// `description` starts empty and is assigned at most once, by the node's
/// own level; children are exclusively owned, in discovery order. File nodes
/// are always leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub description: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn push_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Linearized text form: `<name> (<kind>): <description>`, indented by
    /// 4 spaces per depth level, parent lines before all descendant lines.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();
        self.collect_lines(0, &mut lines);
        lines.join("\n")
    }

    fn collect_lines(&self, indent: usize, lines: &mut Vec<String>) {
        lines.push(format!(
            "{spacer}{name} ({kind}): {description}",
            spacer = " ".repeat(indent),
            name = self.name,
            kind = self.kind.label(),
            description = self.description,
        ));
        for child in &self.children {
            child.collect_lines(indent + 4, lines);
        }
    }
}
