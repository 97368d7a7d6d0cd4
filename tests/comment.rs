#[macro_use]
mod common;

#[cfg(test)]
mod comment {
    tests! {
        line_comments in comment is OK
        "one"
        "two"
    }

    tests! {
        only_comment in comment is OK
    }

    tests! {
        division_is_not_a_comment in comment is OK
        "2"
    }
}
