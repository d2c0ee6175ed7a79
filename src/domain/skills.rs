/// Cleans an admin-entered skill list: trims entries, drops empties and drops
/// case-insensitive repeats while keeping the first spelling in its position.
pub fn normalize_skills<I, S>(skills: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for skill in skills {
        let trimmed = skill.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if !contains_skill(&out, trimmed) {
            out.push(trimmed.to_string());
        }
    }
    out
}

pub fn contains_skill(skills: &[String], wanted: &str) -> bool {
    let wanted = wanted.trim();
    skills.iter().any(|s| s.eq_ignore_ascii_case(wanted))
}
