//! This file defines the navigation bar shown on pages for logged in users.

use maud::{Markup, html};

use crate::{endpoints, html::SITE_NAME};

/// A link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "nav-link active"
        } else {
            "nav-link"
        };

        html!(
            li class="nav-item"
            {
                a href=(self.url) class=(style) aria-current=[self.is_current.then_some("page")]
                {
                    (self.title)
                }
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    /// The staff overview link is only included when `is_staff` is set.
    pub fn new(active_endpoint: &str, is_staff: bool) -> NavBar<'_> {
        let mut pages = vec![
            (endpoints::DASHBOARD, "لوحة التحكم"),
            (endpoints::TRANSACTION, "إيداع / سحب"),
            (endpoints::TRANSFER, "تحويل رصيد"),
        ];

        if is_staff {
            pages.push((endpoints::ADMIN, "الإدارة"));
        }

        let mut links: Vec<Link> = pages
            .into_iter()
            .map(|(url, title)| Link {
                url,
                title,
                is_current: active_endpoint == url,
            })
            .collect();

        links.push(Link {
            url: endpoints::LOG_OUT,
            title: "تسجيل الخروج",
            is_current: false,
        });

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        html!(
            nav class="navbar navbar-expand-lg navbar-dark bg-primary"
            {
                div class="container"
                {
                    a href=(endpoints::ROOT) class="navbar-brand" { (SITE_NAME) }

                    ul class="navbar-nav flex-row flex-wrap gap-3"
                    {
                        @for link in self.links {
                            (link.into_html())
                        }
                    }
                }
            }
        )
    }
}
