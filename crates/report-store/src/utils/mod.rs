pub mod url_history;
