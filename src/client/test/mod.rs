



mod state_redirect;
