//! Defines the [`Route`] tree that describes every navigable path on the site
//! and the logic for flattening it into a route array. The route array is
//! what the [`crate::materialize`] step walks to write static entry points,
//! and the tree itself is what [`crate::router::Router`] resolves locations
//! against.

use std::fmt;

/// The path segment under which each Matasano exercise is mounted.
pub const MATASANO: &str = "matasano";

/// Identifies the component responsible for rendering a [`Route`]. The
/// components themselves live in the front end; this crate only needs to know
/// which one a path maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Page {
    /// The application shell which wraps every other page.
    App,
    Home,
    Projects,
    /// The listing of all Matasano exercises.
    MatasanoExercises,
    /// A single Matasano exercise. The exercise key is the last path segment.
    MatasanoExercise,
    Blog,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Page::App => "App",
            Page::Home => "Home",
            Page::Projects => "Projects",
            Page::MatasanoExercises => "MatasanoExercises",
            Page::MatasanoExercise => "MatasanoExercise",
            Page::Blog => "Blog",
        })
    }
}

/// A node in the route tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// The path relative to the parent route. A leading `/` makes the path
    /// absolute, in which case the parent's path is ignored.
    pub path: String,

    /// The page rendered for this route.
    pub page: Page,

    /// The page rendered when the location ends exactly at this route. It
    /// doesn't contribute an entry of its own to the route array since it
    /// shares its parent's path.
    pub index: Option<Page>,

    /// Nested routes, in declaration order. The order determines the order
    /// of the flattened route array.
    pub children: Vec<Route>,
}

impl Route {
    pub fn new(path: impl Into<String>, page: Page) -> Route {
        Route {
            path: path.into(),
            page,
            index: None,
            children: Vec::new(),
        }
    }

    pub fn with_index(mut self, page: Page) -> Route {
        self.index = Some(page);
        self
    }

    pub fn with_children(mut self, children: Vec<Route>) -> Route {
        self.children = children;
        self
    }
}

/// Creates one [`Page::MatasanoExercise`] route per exercise key, preserving
/// the order of `keys`.
pub fn exercise_routes<'a, I>(keys: I) -> Vec<Route>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .map(|key| Route::new(key, Page::MatasanoExercise))
        .collect()
}

/// Builds the site's route tree. The root (`/`) renders the [`Page::App`]
/// shell with [`Page::Home`] as its index, followed by `projects`,
/// `matasano` (with one child per key in `exercise_keys`), and `blog`.
pub fn build_route_tree<'a, I>(exercise_keys: I) -> Route
where
    I: IntoIterator<Item = &'a str>,
{
    Route::new("/", Page::App)
        .with_index(Page::Home)
        .with_children(vec![
            Route::new("projects", Page::Projects),
            Route::new(MATASANO, Page::MatasanoExercises)
                .with_children(exercise_routes(exercise_keys)),
            Route::new("blog", Page::Blog),
        ])
}

/// Walks `tree` depth-first and returns the full path of every route, parents
/// before their children.
pub fn flatten(tree: &Route) -> Vec<String> {
    let mut routes = Vec::new();
    flatten_into(tree, "/", &mut routes);
    routes
}

fn flatten_into(route: &Route, parent: &str, routes: &mut Vec<String>) {
    let path = join(parent, &route.path);
    routes.push(path.clone());
    for child in route.children.iter() {
        flatten_into(child, &path, routes);
    }
}

/// Returns the route array for the given exercise keys. Shorthand for
/// `flatten(&build_route_tree(exercise_keys))`.
pub fn route_array<'a, I>(exercise_keys: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    flatten(&build_route_tree(exercise_keys))
}

/// Joins a child path onto its parent's path. Repeated and trailing
/// separators are collapsed, and the result always starts with `/`.
pub fn join(parent: &str, child: &str) -> String {
    let parent = if child.starts_with('/') { "" } else { parent };
    let joined: Vec<&str> = segments(parent).chain(segments(child)).collect();
    format!("/{}", joined.join("/"))
}

/// Splits a path into its non-empty segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_route_array_with_exercises() {
        assert_eq!(
            vec![
                "/",
                "/projects",
                "/matasano",
                "/matasano/1-1",
                "/matasano/1-2",
                "/blog"
            ],
            route_array(vec!["1-1", "1-2"]),
        );
    }

    #[test]
    fn test_route_array_without_exercises() {
        assert_eq!(
            vec!["/", "/projects", "/matasano", "/blog"],
            route_array(Vec::new()),
        );
    }

    #[test]
    fn test_route_array_length() {
        let keys: Vec<String> = (1..=8).map(|i| format!("1-{}", i)).collect();
        for n in 0..keys.len() {
            let routes = route_array(keys[..n].iter().map(String::as_str));
            assert_eq!(4 + n, routes.len());
        }
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let tree = build_route_tree(vec!["2-9", "1-3", "1-1"]);
        let first = flatten(&tree);
        for _ in 0..10 {
            assert_eq!(first, flatten(&tree));
        }
        // key order is preserved, not sorted
        assert_eq!("/matasano/2-9", first[3]);
        assert_eq!("/matasano/1-1", first[5]);
    }

    #[test]
    fn test_build_route_tree_shape() {
        let tree = build_route_tree(vec!["1-1"]);
        assert_eq!(Page::App, tree.page);
        assert_eq!(Some(Page::Home), tree.index);
        let children: Vec<(&str, Page)> = tree
            .children
            .iter()
            .map(|r| (r.path.as_str(), r.page))
            .collect();
        assert_eq!(
            vec![
                ("projects", Page::Projects),
                ("matasano", Page::MatasanoExercises),
                ("blog", Page::Blog),
            ],
            children,
        );
        assert_eq!(
            vec![Route::new("1-1", Page::MatasanoExercise)],
            tree.children[1].children,
        );
    }

    #[test]
    fn test_join() {
        assert_eq!("/", join("/", "/"));
        assert_eq!("/", join("", ""));
        assert_eq!("/matasano", join("/", "matasano"));
        assert_eq!("/matasano/1-1", join("/matasano/", "1-1"));
        assert_eq!("/matasano/1-1", join("//matasano", "1-1/"));
        assert_eq!("/blog", join("/matasano", "/blog"));
    }
}
