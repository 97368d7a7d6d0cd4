#[macro_use]
mod common;

#[cfg(test)]
mod _return {
    tests! {
        after_return in return is OK
        "done"
    }

    tests! {
        return_nil in return is OK
        "nil"
    }

    tests! {
        top_level in return is ERR
        "[line 1] Error at 'return': Can't return from top-level code."
    }

    tests! {
        top_level_value in return is ERR
        "[line 1] Error at 'return': Can't return from top-level code."
    }
}
