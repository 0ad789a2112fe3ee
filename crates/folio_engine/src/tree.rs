use std::collections::BTreeMap;

const INDENT: usize = 4;

#[derive(Debug, Default)]
struct Node {
    files: Vec<String>,
    dirs: BTreeMap<String, Node>,
}

/// Render the project tree for a set of `/`-separated labels.
///
/// Files are listed as `- name`, directories as `[name]/`, each level indented
/// by four spaces; files come before sub-directories and both are sorted.
pub fn tree_lines<'a>(labels: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut root = Node::default();
    for label in labels {
        let mut parts: Vec<&str> = label.split('/').filter(|p| !p.is_empty()).collect();
        let Some(file) = parts.pop() else {
            continue;
        };
        let mut node = &mut root;
        for dir in parts {
            node = node.dirs.entry(dir.to_string()).or_default();
        }
        node.files.push(file.to_string());
    }

    let mut lines = Vec::new();
    render(&mut root, 0, &mut lines);
    lines
}

fn render(node: &mut Node, depth: usize, out: &mut Vec<String>) {
    let pad = " ".repeat(depth * INDENT);
    node.files.sort();
    for file in &node.files {
        out.push(format!("{pad}- {file}"));
    }
    for (name, child) in node.dirs.iter_mut() {
        out.push(format!("{pad}[{name}]/"));
        render(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::tree_lines;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_tree_is_sorted_and_indented() {
        let lines = tree_lines(["src/main.rs", "README.md", "src/lib.rs", "src/bin/cli.rs"]);
        assert_eq!(
            lines,
            vec![
                "- README.md",
                "[src]/",
                "    - lib.rs",
                "    - main.rs",
                "    [bin]/",
                "        - cli.rs",
            ]
        );
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(tree_lines(std::iter::empty::<&str>()).is_empty());
    }
}
