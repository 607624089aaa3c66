use super::types::Component;
use crate::kind::DeclarationKind;
use crate::message::CompletionRequest;

/// Output budget for a generated definition.
pub const GENERATE_MAX_TOKENS: u64 = 1000;

const FORMAT_EXAMPLES: &str = r#"### Output format examples

**For structure:**
```lean
import Mathlib

structure Point2D where
  x : ℝ
  y : ℝ
```

**For class:**
```lean
import Mathlib

class Monoid (G : Type*) where
  mul : G → G → G
  one : G
  mul_assoc : ∀ a b c : G, mul (mul a b) c = mul a (mul b c)
  one_mul : ∀ a : G, mul one a = a
  mul_one : ∀ a : G, mul a one = a
```

**For inductive:**
```lean
import Mathlib

inductive BinaryTree (α : Type*) where
  | leaf : BinaryTree α
  | node : α → BinaryTree α → BinaryTree α → BinaryTree α
```
"#;

/// Render components as prompt lines, one per component, in order.
///
/// Each line reads `- name: type -- description`.
pub fn render_components(components: &[Component]) -> String {
    components
        .iter()
        .map(|c| format!("- {}: {} -- {}", c.name, c.type_annotation, c.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the code generation prompt.
pub fn build_generation_prompt(
    name: &str,
    kind: DeclarationKind,
    components: &[Component],
    description: &str,
) -> String {
    format!(
        "You are a Lean 4 formalization expert.

Generate a complete and syntactically correct Lean 4 definition using the following information.

Object name: {name}
Type: {kind}
Description: {description}

Components:
{components}

---

### Instructions
- Use the provided components to construct a valid Lean 4 `{kind}` definition.
- Include necessary imports (e.g., `import Mathlib`).
- Use proper Lean 4 syntax and indentation.
- Each component becomes one line in the definition body.
- Do NOT include any explanation, markdown, or prose. Output ONLY a Lean 4 code block.

{FORMAT_EXAMPLES}",
        components = render_components(components),
    )
}

/// Wrap the generation prompt into a single-message request.
pub fn generation_request(
    name: &str,
    kind: DeclarationKind,
    components: &[Component],
    description: &str,
    max_tokens: u64,
) -> CompletionRequest {
    CompletionRequest::single(
        build_generation_prompt(name, kind, components, description),
        max_tokens,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_components() -> Vec<Component> {
        vec![
            Component::new("x", "ℝ", "first coordinate"),
            Component::new("y", "ℝ", "second coordinate"),
        ]
    }

    #[test]
    fn test_render_components_preserves_order() {
        assert_eq!(
            render_components(&point_components()),
            "- x: ℝ -- first coordinate\n- y: ℝ -- second coordinate"
        );
    }

    #[test]
    fn test_render_no_components() {
        assert_eq!(render_components(&[]), "");
    }

    #[test]
    fn test_prompt_carries_inputs() {
        let prompt = build_generation_prompt(
            "Point2D",
            DeclarationKind::Structure,
            &point_components(),
            "A point in the plane",
        );
        assert!(prompt.contains("Object name: Point2D\n"));
        assert!(prompt.contains("Type: structure\n"));
        assert!(prompt.contains("Description: A point in the plane\n"));
        assert!(prompt.contains("Components:\n- x: ℝ -- first coordinate\n- y: ℝ -- second coordinate\n"));
        assert!(prompt.contains("construct a valid Lean 4 `structure` definition"));
    }

    #[test]
    fn test_prompt_has_example_for_every_kind() {
        let prompt = build_generation_prompt("T", DeclarationKind::Class, &[], "");
        for kind in DeclarationKind::ALL {
            assert!(prompt.contains(&format!("**For {kind}:**")));
        }
    }

    #[test]
    fn test_request_budget() {
        let request = generation_request("T", DeclarationKind::Inductive, &[], "", GENERATE_MAX_TOKENS);
        assert_eq!(request.max_tokens, 1000);
        assert_eq!(request.messages.len(), 1);
    }
}
