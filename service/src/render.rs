//! Static markup for the operator panel. No business logic lives here; the
//! table is a plain projection of `list_all()` output.

use abi::Reservation;
use std::fmt::Write;

pub const LOGIN_PAGE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Operator login</title></head>
<body>
  <form method="post" action="/admin/login">
    <label>Username <input name="username" required></label>
    <label>Password <input name="password" type="password" required></label>
    <button type="submit">Log in</button>
  </form>
</body>
</html>
"#;

pub const LOGIN_FAILED_PAGE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Operator login</title></head>
<body>
  <p>Invalid credentials.</p>
  <p><a href="/admin/login">Try again</a></p>
</body>
</html>
"#;

pub fn reservations_page(reservations: &[Reservation]) -> String {
    let mut rows = String::new();
    for r in reservations {
        // ignore: writing to a String cannot fail
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            r.id,
            escape(&r.name),
            escape(&r.email),
            escape(&r.date),
            escape(&r.time),
            escape(&r.field),
            escape(&r.phone),
            escape(&r.comment),
            r.created_at.format("%Y-%m-%d %H:%M"),
        );
    }

    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Reservations</title></head>
<body>
  <h1>Reservations</h1>
  <p><a href="/admin/logout">Log out</a></p>
  <table>
    <thead>
      <tr><th>ID</th><th>Name</th><th>Email</th><th>Date</th><th>Time</th>
      <th>Field</th><th>Phone</th><th>Comment</th><th>Created</th></tr>
    </thead>
    <tbody>
{rows}    </tbody>
  </table>
</body>
</html>
"#
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
