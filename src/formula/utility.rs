//! Structural queries and rewrites over formula trees.
//!
//! Binders (`FORALL`, `EXISTS`, `EXISTSU`, `CLASS`) carry their bound
//! subject variable as first child. Every function here treats a subject
//! variable occurrence as free unless an enclosing binder names it.

use indexmap::{IndexMap, IndexSet};

use super::element::{Element, ElementList, Operator};

// ── Shape predicates ────────────────────────────────────────────────

/// Returns `true` if `element` is `VAR(name)`.
#[must_use]
pub fn is_subject_variable(element: &Element) -> bool {
    element.as_list().is_some_and(|list| {
        list.operator() == Operator::Var
            && list.len() == 1
            && list.get(0).is_some_and(|name| name.as_atom().is_some())
    })
}

/// Returns `true` if `element` is a two-argument implication.
#[must_use]
pub fn is_implication(element: &Element) -> bool {
    implication_parts(element).is_some()
}

/// Splits a two-argument implication into antecedent and consequent.
#[must_use]
pub fn implication_parts(element: &Element) -> Option<(&Element, &Element)> {
    let list = element.as_list()?;
    if list.operator() != Operator::Impl {
        return None;
    }
    match list.elements() {
        [antecedent, consequent] => Some((antecedent, consequent)),
        _ => None,
    }
}

/// Builds `c1 ∧ … ∧ cn`, or the single condition itself.
#[must_use]
pub fn conjunction(formulas: &[Element]) -> Option<Element> {
    match formulas {
        [] => None,
        [single] => Some(single.clone()),
        many => Some(Element::and(many.to_vec())),
    }
}

/// Returns the bound variable of a binder list.
fn binder_variable(list: &ElementList) -> Option<&Element> {
    if !list.operator().is_binder() {
        return None;
    }
    list.get(0).filter(|var| is_subject_variable(var))
}

// ── Variable collection ─────────────────────────────────────────────

/// Collects the subject variables occurring free in `element`, in order of
/// first occurrence.
#[must_use]
pub fn free_subject_variables(element: &Element) -> IndexSet<Element> {
    let mut free = IndexSet::new();
    collect_free(element, &mut Vec::new(), &mut free);
    free
}

fn collect_free<'a>(
    element: &'a Element,
    bound: &mut Vec<&'a Element>,
    free: &mut IndexSet<Element>,
) {
    let Element::List(list) = element else {
        return;
    };
    if is_subject_variable(element) {
        if !bound.contains(&element) {
            free.insert(element.clone());
        }
        return;
    }
    if let Some(var) = binder_variable(list) {
        bound.push(var);
        for child in list.elements().iter().skip(1) {
            collect_free(child, bound, free);
        }
        bound.pop();
        return;
    }
    for child in list.elements() {
        collect_free(child, bound, free);
    }
}

/// Collects the subject variables bound by any binder in `element`.
#[must_use]
pub fn bound_subject_variables(element: &Element) -> IndexSet<Element> {
    let mut bound = IndexSet::new();
    collect_bound(element, &mut bound);
    bound
}

fn collect_bound(element: &Element, bound: &mut IndexSet<Element>) {
    let Element::List(list) = element else {
        return;
    };
    if let Some(var) = binder_variable(list) {
        bound.insert(var.clone());
    }
    for child in list.elements() {
        collect_bound(child, bound);
    }
}

// ── Subject variable substitution ───────────────────────────────────

/// Replaces every free occurrence of the subject variable `variable` by
/// `term`.
#[must_use]
pub fn replace_free_subject_variable(element: &Element, variable: &Element, term: &Element) -> Element {
    let mut map = IndexMap::with_capacity(1);
    map.insert(variable.clone(), term.clone());
    replace_free_subject_variables(element, &map)
}

/// Simultaneously replaces free occurrences of each key of `map` by its
/// value.
#[must_use]
pub fn replace_free_subject_variables(
    element: &Element,
    map: &IndexMap<Element, Element>,
) -> Element {
    substitute_free(element, map, &mut Vec::new())
}

fn substitute_free(
    element: &Element,
    map: &IndexMap<Element, Element>,
    bound: &mut Vec<Element>,
) -> Element {
    let Element::List(list) = element else {
        return element.clone();
    };
    if is_subject_variable(element) {
        if !bound.contains(element) {
            if let Some(term) = map.get(element) {
                return term.clone();
            }
        }
        return element.clone();
    }
    if let Some(var) = binder_variable(list) {
        bound.push(var.clone());
        let mut children = Vec::with_capacity(list.len());
        children.push(var.clone());
        for child in list.elements().iter().skip(1) {
            children.push(substitute_free(child, map, bound));
        }
        bound.pop();
        return Element::list(list.operator(), children);
    }
    let children = list
        .elements()
        .iter()
        .map(|child| substitute_free(child, map, bound))
        .collect();
    Element::list(list.operator(), children)
}

/// Replaces every occurrence of `from` by `to`, free or bound.
fn replace_all(element: &Element, from: &Element, to: &Element) -> Element {
    if element == from {
        return to.clone();
    }
    match element {
        Element::Atom(_) => element.clone(),
        Element::List(list) => Element::list(
            list.operator(),
            list.elements()
                .iter()
                .map(|child| replace_all(child, from, to))
                .collect(),
        ),
    }
}

/// Renames the bound variable `original` to `replacement` inside the binder
/// that is the `occurrence`-th (zero-based, pre-order) binder of `original`
/// in `element`.
///
/// Binders of `original` before and after that occurrence are left as they
/// are. If there are fewer binders than `occurrence + 1`, the formula is
/// returned unchanged.
#[must_use]
pub fn replace_subject_variable_quantifier(
    original: &Element,
    replacement: &Element,
    element: &Element,
    occurrence: usize,
) -> Element {
    let mut seen = 0;
    rename_binder(original, replacement, element, occurrence, &mut seen)
}

fn rename_binder(
    original: &Element,
    replacement: &Element,
    element: &Element,
    occurrence: usize,
    seen: &mut usize,
) -> Element {
    let Element::List(list) = element else {
        return element.clone();
    };
    if binder_variable(list) == Some(original) {
        if *seen == occurrence {
            *seen += 1;
            return replace_all(element, original, replacement);
        }
        *seen += 1;
    }
    let children = list
        .elements()
        .iter()
        .map(|child| rename_binder(original, replacement, child, occurrence, seen))
        .collect();
    Element::list(list.operator(), children)
}

/// Returns the `occurrence`-th (zero-based, pre-order) binder of
/// `variable` in `element`, counted the same way as
/// [`replace_subject_variable_quantifier`].
#[must_use]
pub fn subject_variable_quantifier<'a>(
    variable: &Element,
    element: &'a Element,
    occurrence: usize,
) -> Option<&'a Element> {
    let mut seen = 0;
    find_binder(variable, element, occurrence, &mut seen)
}

fn find_binder<'a>(
    variable: &Element,
    element: &'a Element,
    occurrence: usize,
    seen: &mut usize,
) -> Option<&'a Element> {
    let Element::List(list) = element else {
        return None;
    };
    if binder_variable(list) == Some(variable) {
        if *seen == occurrence {
            return Some(element);
        }
        *seen += 1;
    }
    list.elements()
        .iter()
        .find_map(|child| find_binder(variable, child, occurrence, seen))
}

// ── Operator variable substitution ──────────────────────────────────

/// Returns `true` if `candidate` is an application of the same operator
/// variable as `template`: same operator, same name and same arity.
fn matches_template(candidate: &ElementList, template: &ElementList) -> bool {
    candidate.operator() == template.operator()
        && candidate.name().is_some()
        && candidate.name() == template.name()
        && candidate.len() == template.len()
}

/// Replaces every occurrence `p(t1, …, tn)` of the operator variable
/// `template = p(x1, …, xn)` in `element` by `replacement` with each `xi`
/// substituted by the corresponding `ti`.
///
/// Nested occurrences inside the arguments are replaced first.
#[must_use]
pub fn replace_operator_variable(
    element: &Element,
    template: &Element,
    replacement: &Element,
) -> Element {
    let Some(template_list) = template.as_list() else {
        return element.clone();
    };
    replace_operator(element, template_list, replacement, false)
}

/// Like [`replace_operator_variable`], but first renames each bound
/// variable of `replacement` that occurs free in an argument of the
/// occurrence, so the arguments are never captured.
///
/// Renamed variables get the old name followed by primes, fresh for the
/// occurrence.
#[must_use]
pub fn expand_operator_variable(
    element: &Element,
    template: &Element,
    replacement: &Element,
) -> Element {
    let Some(template_list) = template.as_list() else {
        return element.clone();
    };
    replace_operator(element, template_list, replacement, true)
}

fn replace_operator(
    element: &Element,
    template: &ElementList,
    replacement: &Element,
    rename_apart: bool,
) -> Element {
    let Element::List(list) = element else {
        return element.clone();
    };
    let children: Vec<Element> = list
        .elements()
        .iter()
        .map(|child| replace_operator(child, template, replacement, rename_apart))
        .collect();
    if !matches_template(list, template) {
        return Element::list(list.operator(), children);
    }
    let map: IndexMap<Element, Element> = template
        .arguments()
        .iter()
        .cloned()
        .zip(children.into_iter().skip(1))
        .collect();
    if !rename_apart {
        return replace_free_subject_variables(replacement, &map);
    }
    let avoid: IndexSet<Element> = map.values().flat_map(free_subject_variables).collect();
    replace_free_subject_variables(&rename_bound_apart(replacement, &avoid), &map)
}

/// Renames every binder of a variable in `avoid` to a fresh variable.
fn rename_bound_apart(element: &Element, avoid: &IndexSet<Element>) -> Element {
    let Element::List(list) = element else {
        return element.clone();
    };
    let renamed = Element::list(
        list.operator(),
        list.elements()
            .iter()
            .map(|child| rename_bound_apart(child, avoid))
            .collect(),
    );
    let Some(var) = binder_variable(list).filter(|var| avoid.contains(*var)) else {
        return renamed;
    };
    let fresh = fresh_variable(var, &renamed, avoid);
    replace_all(&renamed, var, &fresh)
}

/// Returns `VAR(name')`, `VAR(name'')`, … whichever first occurs neither
/// in `scope` nor in `avoid`.
fn fresh_variable(var: &Element, scope: &Element, avoid: &IndexSet<Element>) -> Element {
    let base = var
        .as_list()
        .and_then(|list| list.get(0))
        .and_then(Element::as_atom)
        .unwrap_or("x");
    let mut taken = free_subject_variables(scope);
    taken.extend(bound_subject_variables(scope));
    let mut name = format!("{base}'");
    loop {
        let candidate = Element::subject_variable(name.clone());
        if !taken.contains(&candidate) && !avoid.contains(&candidate) {
            return candidate;
        }
        name.push('\'');
    }
}

/// Returns `true` if the operator variable `template` occurs in `element`
/// with the same name and arity.
#[must_use]
pub fn contains_operator_variable(element: &Element, template: &Element) -> bool {
    let Some(template_list) = template.as_list() else {
        return false;
    };
    contains_operator(element, template_list)
}

fn contains_operator(element: &Element, template: &ElementList) -> bool {
    let Element::List(list) = element else {
        return false;
    };
    matches_template(list, template)
        || list
            .elements()
            .iter()
            .any(|child| contains_operator(child, template))
}

/// Returns `true` if some occurrence of `template` in `element` either sits
/// under a binder of one of `variables` or passes an argument in which one
/// of `variables` occurs free.
///
/// This is the capture test for substituting a formula whose bound
/// variables are `variables` at each occurrence site.
#[must_use]
pub fn operator_variable_meets_variables(
    element: &Element,
    template: &Element,
    variables: &IndexSet<Element>,
) -> bool {
    let Some(template_list) = template.as_list() else {
        return false;
    };
    if variables.is_empty() {
        return false;
    }
    meets_variables(element, template_list, variables, &mut Vec::new())
}

fn meets_variables(
    element: &Element,
    template: &ElementList,
    variables: &IndexSet<Element>,
    bound: &mut Vec<Element>,
) -> bool {
    let Element::List(list) = element else {
        return false;
    };
    if matches_template(list, template) {
        if bound.iter().any(|var| variables.contains(var)) {
            return true;
        }
        let argument_meets = list.arguments().iter().any(|argument| {
            free_subject_variables(argument)
                .iter()
                .any(|var| variables.contains(var))
        });
        if argument_meets {
            return true;
        }
    }
    let binder = binder_variable(list).cloned();
    let pushed = binder.is_some();
    if let Some(var) = binder {
        bound.push(var);
    }
    let found = list
        .elements()
        .iter()
        .any(|child| meets_variables(child, template, variables, bound));
    if pushed {
        bound.pop();
    }
    found
}

// ── Difference location ─────────────────────────────────────────────

/// Returns the child-index path to the first place where `expected` and
/// `actual` differ, or `None` if they are equal.
///
/// The path stops at the deepest node whose operator and arity still agree;
/// an empty path means the roots themselves differ in shape.
#[must_use]
pub fn first_difference(expected: &Element, actual: &Element) -> Option<Vec<usize>> {
    if expected == actual {
        return None;
    }
    let mut path = Vec::new();
    let mut left = expected;
    let mut right = actual;
    loop {
        let (Element::List(l), Element::List(r)) = (left, right) else {
            return Some(path);
        };
        if l.operator() != r.operator() || l.len() != r.len() {
            return Some(path);
        }
        let Some((index, (next_left, next_right))) = l
            .elements()
            .iter()
            .zip(r.elements())
            .enumerate()
            .find(|(_, (a, b))| a != b)
        else {
            return Some(path);
        };
        path.push(index);
        left = next_left;
        right = next_right;
    }
}

#[cfg(test)]
#[path = "utility_tests.rs"]
mod tests;
