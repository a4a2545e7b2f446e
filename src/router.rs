//! Defines the [`Router`] which resolves browser locations against a
//! [`Route`] tree. Navigation updates the current location and then fires an
//! optional post-navigation hook (the front end uses it to re-typeset math on
//! every page change).

use crate::route::{self, Page, Route};
use percent_encoding::percent_decode_str;
use std::fmt;
use std::str::Utf8Error;
use url::{ParseError, Url};

/// The origin locations are resolved against when none is provided.
pub const DEFAULT_ORIGIN: &str = "http://localhost/";

/// The result of resolving a path against the route tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    /// The page to render.
    pub page: Page,

    /// The normalized path that was matched (e.g., `/matasano/1-1`).
    pub path: String,

    /// The exercise key, for [`Page::MatasanoExercise`] matches only.
    pub exercise: Option<String>,
}

/// Resolves paths to pages and keeps track of the current location.
pub struct Router {
    tree: Route,
    location: Url,
    // `location`'s path with each segment percent-decoded
    path: String,
    on_update: Option<Box<dyn FnMut(&str)>>,
}

impl Router {
    /// Constructs a router for `tree` whose location starts at the root of
    /// [`DEFAULT_ORIGIN`].
    pub fn new(tree: Route) -> Result<Router> {
        Router::with_origin(tree, &Url::parse(DEFAULT_ORIGIN)?)
    }

    /// Constructs a router for `tree` whose location starts at the root of
    /// `origin`. Absolute locations on any other origin are rejected by
    /// [`Router::navigate`].
    pub fn with_origin(tree: Route, origin: &Url) -> Result<Router> {
        Ok(Router {
            tree,
            location: origin.join("/")?,
            path: String::from("/"),
            on_update: None,
        })
    }

    /// Registers the hook to invoke with the new path after every successful
    /// navigation. Replaces any previously registered hook.
    pub fn on_update<F>(&mut self, hook: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.on_update = Some(Box::new(hook));
    }

    /// The current location's path, percent-decoded.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolves `path` against the route tree. Trailing and repeated slashes
    /// are ignored. Returns `None` if no route matches.
    pub fn resolve(&self, path: &str) -> Option<Match> {
        let segments: Vec<&str> = route::segments(path).collect();
        let matched = find(&self.tree, &segments)?;
        let page = matched.index.unwrap_or(matched.page);
        Some(Match {
            page,
            path: route::join("/", path),
            exercise: match page {
                Page::MatasanoExercise => Some(matched.path.clone()),
                _ => None,
            },
        })
    }

    /// Navigates to `href`, which may be an absolute URL on the router's
    /// origin or a reference relative to the current location (e.g., `1-2`
    /// from `/matasano/1-1` lands on `/matasano/1-2`). The query and fragment
    /// are dropped and each path segment is percent-decoded before it is
    /// matched, so `/matasano/1%201` resolves the exercise `1 1`. On success
    /// the location is updated and the hook (if any) is invoked with the
    /// decoded path; on failure the location is left unchanged.
    pub fn navigate(&mut self, href: &str) -> Result<Match> {
        let mut target = match Url::parse(href) {
            Ok(absolute) => absolute,
            Err(ParseError::RelativeUrlWithoutBase) => self.location.join(href)?,
            Err(e) => return Err(Error::UrlParse(e)),
        };
        if target.origin() != self.location.origin() {
            return Err(Error::ExternalLocation(target));
        }
        target.set_query(None);
        target.set_fragment(None);

        let path = decoded_path(&target)?;
        let matched = self
            .resolve(&path)
            .ok_or_else(|| Error::NotFound(path.clone()))?;
        self.location = target;
        self.path = matched.path.clone();
        if let Some(hook) = self.on_update.as_mut() {
            hook(&self.path);
        }
        Ok(matched)
    }
}

fn decoded_path(url: &Url) -> Result<String> {
    let mut segments = Vec::new();
    for segment in url.path_segments().into_iter().flatten() {
        segments.push(percent_decode_str(segment).decode_utf8()?);
    }
    Ok(route::join("/", &segments.join("/")))
}

fn find<'r>(route: &'r Route, segments: &[&str]) -> Option<&'r Route> {
    let own: Vec<&str> = route::segments(&route.path).collect();
    if segments.len() < own.len() || segments[..own.len()] != own[..] {
        return None;
    }
    let rest = &segments[own.len()..];
    if rest.is_empty() {
        return Some(route);
    }
    route.children.iter().find_map(|child| find(child, rest))
}

/// The result of a fallible routing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error resolving or navigating to a location.
#[derive(Debug)]
pub enum Error {
    /// Returned when a location can't be parsed as a URL.
    UrlParse(ParseError),

    /// Returned when no route matches the location's path.
    NotFound(String),

    /// Returned when an absolute location points at a different origin.
    ExternalLocation(Url),

    /// Returned when a percent-decoded path segment isn't valid UTF-8.
    Utf8(Utf8Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UrlParse(err) => err.fmt(f),
            Error::NotFound(path) => write!(f, "no route matches `{}`", path),
            Error::ExternalLocation(url) => {
                write!(f, "`{}` is outside of the site", url)
            }
            Error::Utf8(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UrlParse(err) => Some(err),
            Error::NotFound(_) => None,
            Error::ExternalLocation(_) => None,
            Error::Utf8(err) => Some(err),
        }
    }
}

impl From<Utf8Error> for Error {
    /// Converts a [`Utf8Error`] into an [`Error`]. It allows us to use the `?`
    /// operator when percent-decoding path segments.
    fn from(err: Utf8Error) -> Error {
        Error::Utf8(err)
    }
}

impl From<ParseError> for Error {
    /// Converts a [`ParseError`] into an [`Error`]. It allows us to use the
    /// `?` operator for URL parsing and joining functions.
    fn from(err: ParseError) -> Error {
        Error::UrlParse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::route::build_route_tree;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn router() -> Result<Router> {
        Router::new(build_route_tree(vec!["1-1", "1-2"]))
    }

    #[test]
    fn test_resolve_static_pages() -> Result<()> {
        let router = router()?;
        let cases = vec![
            ("/", Page::Home),
            ("", Page::Home),
            ("/projects", Page::Projects),
            ("/matasano", Page::MatasanoExercises),
            ("/matasano/", Page::MatasanoExercises),
            ("/blog", Page::Blog),
        ];
        for (path, wanted) in cases {
            match router.resolve(path) {
                Some(m) => {
                    assert_eq!(wanted, m.page, "resolving `{}`", path);
                    assert_eq!(None, m.exercise);
                }
                None => panic!("no match for `{}`", path),
            }
        }
        Ok(())
    }

    #[test]
    fn test_resolve_exercise() -> Result<()> {
        assert_eq!(
            Some(Match {
                page: Page::MatasanoExercise,
                path: String::from("/matasano/1-2"),
                exercise: Some(String::from("1-2")),
            }),
            router()?.resolve("//matasano/1-2/"),
        );
        Ok(())
    }

    #[test]
    fn test_resolve_unknown() -> Result<()> {
        let router = router()?;
        assert_eq!(None, router.resolve("/matasano/9-9"));
        assert_eq!(None, router.resolve("/1-1"));
        assert_eq!(None, router.resolve("/blog/post"));
        Ok(())
    }

    #[test]
    fn test_navigate_invokes_hook() -> Result<()> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut router = router()?;
        let hook_seen = Rc::clone(&seen);
        router.on_update(move |path| hook_seen.borrow_mut().push(path.to_owned()));

        router.navigate("/matasano/1-1")?;
        let m = router.navigate("1-2?lang=rust#solution")?;
        assert_eq!(Some(String::from("1-2")), m.exercise);
        router.navigate("http://localhost/blog")?;

        assert_eq!(
            vec!["/matasano/1-1", "/matasano/1-2", "/blog"],
            *seen.borrow(),
        );
        assert_eq!("/blog", router.path());
        Ok(())
    }

    #[test]
    fn test_navigate_without_hook() -> Result<()> {
        let mut router = router()?;
        assert_eq!(Page::Projects, router.navigate("projects")?.page);
        assert_eq!("/projects", router.path());
        Ok(())
    }

    #[test]
    fn test_navigate_not_found_keeps_location() -> Result<()> {
        let calls = Rc::new(RefCell::new(0));
        let mut router = router()?;
        let hook_calls = Rc::clone(&calls);
        router.on_update(move |_| *hook_calls.borrow_mut() += 1);

        router.navigate("/matasano")?;
        match router.navigate("/nowhere") {
            Err(Error::NotFound(path)) => assert_eq!("/nowhere", path),
            other => panic!("wanted NotFound; found {:?}", other),
        }
        assert_eq!("/matasano", router.path());
        assert_eq!(1, *calls.borrow());
        Ok(())
    }

    #[test]
    fn test_navigate_decodes_exercise_key() -> Result<()> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut router = Router::new(build_route_tree(vec!["1 1", "café"]))?;
        let hook_seen = Rc::clone(&seen);
        router.on_update(move |path| hook_seen.borrow_mut().push(path.to_owned()));

        let m = router.navigate("/matasano/1 1")?;
        assert_eq!(Page::MatasanoExercise, m.page);
        assert_eq!(Some(String::from("1 1")), m.exercise);
        assert_eq!("/matasano/1 1", router.path());

        let m = router.navigate("caf%C3%A9")?;
        assert_eq!(Some(String::from("café")), m.exercise);

        assert_eq!(vec!["/matasano/1 1", "/matasano/café"], *seen.borrow());
        Ok(())
    }

    #[test]
    fn test_navigate_invalid_utf8() -> Result<()> {
        let mut router = router()?;
        match router.navigate("/matasano/%FF") {
            Err(Error::Utf8(_)) => {}
            other => panic!("wanted Utf8 error; found {:?}", other),
        }
        assert_eq!("/", router.path());
        Ok(())
    }

    #[test]
    fn test_navigate_external() -> Result<()> {
        match router()?.navigate("https://example.org/blog") {
            Err(Error::ExternalLocation(url)) => {
                assert_eq!("https://example.org/blog", url.as_str())
            }
            other => panic!("wanted ExternalLocation; found {:?}", other),
        }
        Ok(())
    }
}
