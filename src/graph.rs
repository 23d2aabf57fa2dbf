use graphviz_rust::dot_structures::{
    Attribute, Edge, EdgeTy, Graph, Id, Node, NodeId, Stmt, Vertex,
};
use graphviz_rust::printer::PrinterContext;

use crate::snapshot::{EdgeHighlight, EdgeRecord, Snapshot};

// Convert a snapshot into a graphviz digraph, edges pointing from child to parent
impl Snapshot {
    pub fn to_graphviz(&self) -> Graph {
        let mut stmts = vec![Stmt::Attribute(attribute("rankdir", "BT"))];
        stmts.extend(
            self.vertices
                .iter()
                .map(|v| Stmt::Node(Node::new(node_id(*v), vec![attribute("shape", "circle")]))),
        );
        stmts.extend(self.edges.iter().map(|edge| Stmt::Edge(edge.to_graphviz())));
        Graph::DiGraph {
            id: Id::Plain("forest".to_string()),
            strict: false,
            stmts,
        }
    }

    pub fn to_dot(&self) -> String {
        graphviz_rust::print(self.to_graphviz(), &mut PrinterContext::default())
    }
}

impl EdgeRecord {
    fn to_graphviz(&self) -> Edge {
        let (p, q) = self.provenance;
        let mut attributes = vec![attribute("label", &quote(format!("({p},{q}) #{}", self.timestamp)))];
        match self.highlight {
            EdgeHighlight::Normal => {}
            EdgeHighlight::Selected => {
                attributes.push(attribute("color", "red"));
                attributes.push(attribute("penwidth", "3"));
            }
            EdgeHighlight::AlreadySelected => attributes.push(attribute("color", "orange")),
        }
        Edge {
            ty: EdgeTy::Pair(Vertex::N(node_id(self.child)), Vertex::N(node_id(self.parent))),
            attributes,
        }
    }
}

fn node_id(element: i64) -> NodeId {
    // negative elements are not valid plain ids
    NodeId(Id::Plain(quote(element.to_string())), None)
}

fn attribute(key: &str, value: &str) -> Attribute {
    Attribute(Id::Plain(key.to_string()), Id::Plain(value.to_string()))
}

fn quote(s: String) -> String {
    format!("{:?}", s)
}

#[cfg(test)]
mod tests {
    use crate::{snapshot::Highlights, UnionFind};

    #[test]
    fn dot_contains_labelled_edges() {
        let mut uf = UnionFind::default();
        uf.merge(1, 2);
        uf.merge(-3, 2);
        let dot = uf
            .snapshot_with_highlights(&Highlights {
                selected: vec![(1, 2)],
                ..Default::default()
            })
            .to_dot();
        assert!(dot.contains("digraph forest"));
        assert!(dot.contains("\"1\" -> \"2\""));
        assert!(dot.contains("\"-3\" -> \"2\""));
        assert!(dot.contains("label=\"(1,2) #0\""));
        assert!(dot.contains("color=red"));
    }
}
