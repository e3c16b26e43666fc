use crate::models::Doctor;

/// Distinct branches of the bookable doctors. Case-insensitive duplicates keep
/// the first spelling seen.
pub fn distinct_branches(doctors: &[Doctor]) -> Vec<String> {
    let mut branches: Vec<String> = Vec::new();

    for doctor in doctors.iter().filter(|d| d.is_bookable()) {
        let branch = doctor.branch.trim();
        if branch.is_empty() {
            continue;
        }
        if !branches.iter().any(|known| known.eq_ignore_ascii_case(branch)) {
            branches.push(branch.to_string());
        }
    }

    branches.sort_by_key(|b| b.to_lowercase());
    branches
}

/// Canonical spelling of `input` within `branches`, if any.
pub fn match_branch<'a>(branches: &'a [String], input: &str) -> Option<&'a String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    branches.iter().find(|b| b.eq_ignore_ascii_case(input))
}

/// Active doctors working at `branch`.
pub fn doctors_in_branch<'a>(doctors: &'a [Doctor], branch: &str) -> Vec<&'a Doctor> {
    doctors
        .iter()
        .filter(|d| d.is_active() && d.works_at(branch))
        .collect()
}
