/*!
 * ASCII directory tree rendering
 */

use crate::types::TreeNode;

const BRANCH: &str = "|-- ";
const LAST_BRANCH: &str = "`-- ";
const PIPE: &str = "|   ";
const SPACE: &str = "    ";

/// Render `root` and its descendants, one entry per line.
///
/// Children keep the order they have in the node; the scanner already sorted them.
pub fn render(root: &TreeNode) -> Vec<String> {
    let mut lines = vec![root.name.clone()];
    render_children(root, "", &mut lines);
    lines
}

fn render_children(node: &TreeNode, prefix: &str, lines: &mut Vec<String>) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let connector = if last { LAST_BRANCH } else { BRANCH };
        lines.push(format!("{}{}{}", prefix, connector, child.name));

        if child.is_dir() {
            let continuation = if last { SPACE } else { PIPE };
            render_children(child, &format!("{}{}", prefix, continuation), lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_only() {
        let root = TreeNode::directory("empty", vec![]);
        assert_eq!(render(&root), vec!["empty"]);
    }

    #[test]
    fn test_nested_connectors() {
        let root = TreeNode::directory(
            "proj",
            vec![
                TreeNode::file("README"),
                TreeNode::directory(
                    "src",
                    vec![
                        TreeNode::directory("util", vec![TreeNode::file("fmt.py")]),
                        TreeNode::file("main.py"),
                    ],
                ),
                TreeNode::directory("tests", vec![TreeNode::file("test_main.py")]),
            ],
        );

        let expected = vec![
            "proj",
            "|-- README",
            "|-- src",
            "|   |-- util",
            "|   |   `-- fmt.py",
            "|   `-- main.py",
            "`-- tests",
            "    `-- test_main.py",
        ];
        assert_eq!(render(&root), expected);
    }

    #[test]
    fn test_empty_directory_has_no_children_lines() {
        let root = TreeNode::directory("r", vec![TreeNode::directory("empty", vec![])]);
        assert_eq!(render(&root), vec!["r", "`-- empty"]);
    }
}
