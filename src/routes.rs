use std::fmt;

/// Pages the client can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Bills,
    NewBill,
    Dashboard,
    ErrorPage,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Bills => "#employee/bills",
            Route::NewBill => "#employee/bill/new",
            Route::Dashboard => "#admin/dashboard",
            Route::ErrorPage => "#error",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Receives navigation requests from the controllers
pub trait Navigator {
    fn navigate(&self, route: Route, message: Option<&str>);
}

impl<F> Navigator for F
where
    F: Fn(Route, Option<&str>),
{
    fn navigate(&self, route: Route, message: Option<&str>) {
        self(route, message)
    }
}
