use crate::model::{Catalog, SUBMIT_SENTINEL, Target};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The static graph view of a catalog.
///
/// `Schematic` is derived from a catalog for visualization and documentation.
/// The engine itself never consults it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Schematic {
    pub name: String,
    pub description: Option<String>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Schematic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// One node per distinct question id, a terminal submit node, and one
    /// node per distinct dangling target so every edge has both ends.
    pub fn from_catalog(name: impl Into<String>, catalog: &Catalog) -> Self {
        let mut schematic = Schematic::new(name);
        let mut seen = HashSet::new();
        let mut dangling = HashSet::new();

        for (position, question) in catalog.iter().enumerate() {
            if !seen.insert(question.id.as_str()) {
                continue;
            }

            schematic.nodes.push(Node {
                id: question.id.clone(),
                kind: if position == 0 {
                    NodeKind::Ingress
                } else {
                    NodeKind::Question
                },
                label: question
                    .label()
                    .map_or_else(|| question.kind.to_string(), str::to_string),
            });

            let edges = std::iter::once((EdgeKind::Refer, &question.refer_to))
                .chain(question.skip.iter().map(|t| (EdgeKind::Skip, t)));

            for (kind, target) in edges {
                let to = match target {
                    Target::Submit => SUBMIT_SENTINEL.to_string(),
                    Target::Question(id) if catalog.contains(id) => id.clone(),
                    Target::Question(id) => {
                        let node_id = format!("dangling:{id}");
                        if dangling.insert(node_id.clone()) {
                            schematic.nodes.push(Node {
                                id: node_id.clone(),
                                kind: NodeKind::Dangling,
                                label: id.clone(),
                            });
                        }
                        node_id
                    }
                };

                schematic.edges.push(Edge {
                    from: question.id.clone(),
                    to,
                    kind,
                    label: Some(kind.label().to_string()),
                });
            }
        }

        schematic.nodes.push(Node {
            id: SUBMIT_SENTINEL.to_string(),
            kind: NodeKind::Egress,
            label: "Submit".to_string(),
        });

        schematic
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.from == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Ingress,  // First question
    Question, // Any other question
    Egress,   // Submit
    Dangling, // Target id with no question
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    pub label: Option<String>,
}

/// Which navigation field an edge comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Refer,
    Skip,
}

impl EdgeKind {
    pub fn label(self) -> &'static str {
        match self {
            EdgeKind::Refer => "referTo",
            EdgeKind::Skip => "skip",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, QuestionKind};

    #[test]
    fn test_graph_has_submit_and_dangling_nodes() {
        let catalog = Catalog::new(vec![
            Question::new("a", QuestionKind::TextInput)
                .with_label("Name")
                .refer_to(Target::question("b"))
                .skip_to(Target::question("ghost")),
            Question::new("b", QuestionKind::Radio),
        ]);

        let schematic = Schematic::from_catalog("demo", &catalog);

        assert_eq!(schematic.node("a").unwrap().kind, NodeKind::Ingress);
        assert_eq!(schematic.node("a").unwrap().label, "Name");
        assert_eq!(schematic.node("b").unwrap().label, "radio");
        assert_eq!(schematic.node("submit").unwrap().kind, NodeKind::Egress);
        assert_eq!(schematic.node("dangling:ghost").unwrap().kind, NodeKind::Dangling);

        let from_a: Vec<_> = schematic.edges_from("a").map(|e| (e.kind, e.to.as_str())).collect();
        assert_eq!(from_a, vec![(EdgeKind::Refer, "b"), (EdgeKind::Skip, "dangling:ghost")]);

        let from_b: Vec<_> = schematic.edges_from("b").map(|e| e.to.as_str()).collect();
        assert_eq!(from_b, vec!["submit"]);
    }
}
