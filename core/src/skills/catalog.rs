use std::collections::HashMap;
use std::sync::LazyLock;

const STACK_TO_SKILL: &[(&str, &str)] = &[
    ("Next.js", "nextjs"),
    ("React", "react"),
    ("Angular", "angular"),
    ("NestJS", "nestjs"),
    ("FastAPI", "fastapi"),
    (".NET", "dotnet"),
    ("Docker", "docker"),
    ("GitHub Actions", "github-actions"),
    ("Azure DevOps", "azure-devops"),
    ("Bicep", "bicep"),
    ("Terraform", "terraform"),
];

static CATALOG: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| STACK_TO_SKILL.iter().copied().collect());

/// Maps a detected stack name to the skill name searched for in repositories.
///
/// Known stacks use the fixed table; anything else is lowercased with every
/// run of non-alphanumeric characters collapsed into a single `-`.
pub fn skill_name_for(stack: &str) -> String {
    match CATALOG.get(stack) {
        Some(skill) => (*skill).to_string(),
        None => slugify(stack),
    }
}

fn slugify(stack: &str) -> String {
    let mut slug = String::with_capacity(stack.len());
    let mut in_separator = false;

    for c in stack.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            in_separator = false;
        } else if !in_separator {
            slug.push('-');
            in_separator = true;
        }
    }

    slug
}
