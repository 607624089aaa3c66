use crate::message::CompletionRequest;

/// Output budget for a classification verdict.
pub const CLASSIFY_MAX_TOKENS: u64 = 500;

const INSTRUCTION: &str = "\
Instruction:

Analyze the following description of a mathematical object and determine whether it can be represented in Lean 4 as an `inductive`, `structure`, or `class` type.

Description:
";

const KIND_GUIDE_AND_EXAMPLES: &str = r#"
Type definitions in Lean 4:
- inductive — General data types defined by constructors (possibly recursive or indexed). Used for objects built from base cases and constructors (e.g., natural numbers, lists, trees).
- structure — A single-constructor, non-recursive inductive type that groups named fields. Used for records or algebraic structures composed of components (e.g., a point with coordinates, a group with operations).
- class — A structure marked as a type class, providing an interface that can have multiple instances for different types (e.g., `Monoid`, `Group`, `Ring`).

---

### Examples

**Example 1**
Description: "The natural numbers are defined inductively with 0 and the successor function."
Output:
{
  "is_expressible": true,
  "lean4_type": "inductive",
  "confidence": 0.95,
  "reasoning": "It is recursively defined with base case and constructor, typical of inductive types."
}

**Example 2**
Description: "A group $(G, \cdot)$ is a set $G$ together with a binary operation $\cdot : G \times G \to G$ satisfying the following axioms:
1. $(x \cdot y) \cdot z = x \cdot (y \cdot z)$ for all $x, y, z \in G$ (associativity);
2. there exists $e \in G$ such that $e \cdot x = x \cdot e = x$ for all $x \in G$ (identity);
3. for each $x \in G$ there exists $x^{-1} \in G$ such that $x \cdot x^{-1} = x^{-1} \cdot x = e$ (inverse)."
Output:
{
  "is_expressible": true,
  "lean4_type": "class",
  "confidence": 0.95,
  "reasoning": "A group specifies a carrier type, operations, and laws, making it a canonical example of a Lean type class."
}

**Example 3**
Description: "A monoid is a type with a binary operation and an identity element satisfying associativity."
Output:
{
  "is_expressible": true,
  "lean4_type": "class",
  "confidence": 0.85,
  "reasoning": "A monoid is an abstract interface describing operations and laws over any type, suitable as a type class."
}

**Example 4**
Description: "A real matrix of size $m \times n$ is a function $A : \{1,\dots,m\} \times \{1,\dots,n\} \to \mathbb{R}$, defined by $A = (a_{ij})$, where each entry $a_{ij} \in \mathbb{R}$."
Output:
{
  "is_expressible": true,
  "lean4_type": "structure",
  "confidence": 0.9,
  "reasoning": "A matrix has fixed dimensions and components; it is naturally modeled as a structure or a dependent type indexed by size."
}

**Example 5**
Description: "A binary operation * on a set G is a function * : G × G → G."
Output:
{
  "is_expressible": false,
  "lean4_type": null,
  "confidence": 0.95,
  "reasoning": "It defines a function, not a data type or structure."
}

**Example 6**
Description: "$\mathbb{R}^2 = \{(x,y) : x,y \in \mathbb{R}\}$"
Output:
{
  "is_expressible": true,
  "lean4_type": "structure",
  "confidence": 0.9,
  "reasoning": "Represents ordered pairs of real numbers, suitable as a structure with two fields."
}

---

Respond strictly in the following JSON format:
{
    "is_expressible": true/false,
    "lean4_type": "inductive" | "structure" | "class" | null,
    "confidence": 0.0–1.0,
    "reasoning": "Brief explanation of why this type best fits the description"
}
"#;

/// Build the few-shot classification prompt for a description.
///
/// The description is embedded verbatim (LaTeX included).
pub fn build_classification_prompt(description: &str) -> String {
    let mut prompt =
        String::with_capacity(INSTRUCTION.len() + description.len() + KIND_GUIDE_AND_EXAMPLES.len());
    prompt.push_str(INSTRUCTION);
    prompt.push_str(description);
    prompt.push('\n');
    prompt.push_str(KIND_GUIDE_AND_EXAMPLES);
    prompt
}

/// Wrap the classification prompt into a single-message request.
pub fn classification_request(description: &str, max_tokens: u64) -> CompletionRequest {
    CompletionRequest::single(build_classification_prompt(description), max_tokens)
}
